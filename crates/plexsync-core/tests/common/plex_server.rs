//! Minimal HTTP/1.1 server that stands in for a Plex server in integration tests.
//!
//! Routes are matched on method and path (query ignored) and answer with a
//! canned status and body. Every request line is recorded, together with
//! whether it carried the expected `X-Plex-Token`.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    /// Path plus query, as sent.
    pub target: String,
    pub had_token: bool,
}

#[derive(Default)]
pub struct PlexServerBuilder {
    routes: HashMap<(String, String), Route>,
}

pub struct PlexServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl PlexServerBuilder {
    pub fn route(mut self, method: &str, path: &str, route: Route) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), route);
        self
    }

    /// Start serving in a background thread. The server runs until the process exits.
    pub fn start(self, token: &str) -> PlexServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let token = token.to_string();
        {
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    let token = token.clone();
                    thread::spawn(move || handle(stream, &routes, &requests, &token));
                }
            });
        }
        PlexServer {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }
}

impl PlexServer {
    pub fn builder() -> PlexServerBuilder {
        PlexServerBuilder::default()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose path (query stripped) equals `path`.
    pub fn hits(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.target.split('?').next() == Some(path))
            .collect()
    }
}

fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return None,
        }
    }
    String::from_utf8(buf).ok()
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<(String, String), Route>,
    requests: &Mutex<Vec<Recorded>>,
    token: &str,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let head = match read_head(&mut stream) {
        Some(h) => h,
        None => return,
    };

    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();
    let had_token = lines.any(|line| match line.split_once(':') {
        Some((name, value)) => {
            name.trim().eq_ignore_ascii_case("x-plex-token") && value.trim() == token
        }
        None => false,
    });

    requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        target: target.clone(),
        had_token,
    });

    let path = target.split('?').next().unwrap_or("").to_string();
    let route = if had_token {
        routes
            .get(&(method, path))
            .cloned()
            .unwrap_or_else(|| Route::status(404))
    } else {
        Route::status(401)
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason(route.status),
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
