//! Parse `wpa_cli status` output into key/value pairs.

use std::collections::BTreeMap;

/// Parse line-delimited `key=value` output. Lines without `=` are ignored;
/// values keep everything after the first `=`.
pub fn parse_status(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.trim_end_matches('\r').to_string()))
        .collect()
}
