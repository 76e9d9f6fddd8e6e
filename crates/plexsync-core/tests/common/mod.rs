#![allow(dead_code)]

pub mod plex_server;
