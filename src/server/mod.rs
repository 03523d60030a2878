//! TCP accept loop and per-connection workers.

pub mod listener;
