//! # ssr-connector — SoundScape Renderer remote connection
//!
//! Wire and glue layer for the remote-control surface:
//!
//! - Delimiter-framed TCP transport with poll-style timeouts
//! - The renderer's XML request dialect
//! - Controller orchestration: local edits out, renderer updates in
//! - Network settings backed by an XML config file

pub mod config;
pub mod connection;
pub mod controller;
pub mod framing;
pub mod requests;

pub use config::*;
pub use connection::*;
pub use controller::*;
pub use framing::*;
pub use requests::UpdateSpecificator;
