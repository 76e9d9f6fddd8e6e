pub mod config;
pub mod logging;

pub mod fetch;
pub mod inventory;
pub mod media;
pub mod network;
pub mod optimize;
pub mod plex;
pub mod sync;
