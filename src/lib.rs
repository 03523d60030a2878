//! Quill - minimal persistent-connection HTTP/1.1 file server
//!
//! Core library: request scanning and parsing, routing, file transfer
//! and the per-connection loop.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
