//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.1 server engine with persistent
//! connections, reading requests straight off the byte stream.
//!
//! # Architecture
//!
//! - **`scanner`**: Finds the `\r\n\r\n` header terminator byte by byte, leaving the stream on the body
//! - **`parser`**: Turns the header block into a [`request::Request`]
//! - **`body`**: Reads exactly Content-Length body bytes
//! - **`request`**: HTTP request representation and header helpers
//! - **`response`**: HTTP response representation with builder pattern
//! - **`encoding`**: gzip negotiation and header text encoding
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: The request-response state machine for one client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Scan header block, read body
//!        └──────┬──────┘
//!               │ Request received (or malformed → 400, close)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and run handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```
//!
//! An empty header block (peer closed) moves `Reading` straight to `Closed`.

pub mod body;
pub mod connection;
pub mod encoding;
pub mod parser;
pub mod request;
pub mod response;
pub mod scanner;
pub mod writer;
