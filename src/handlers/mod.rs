//! Route handlers.
//!
//! The text routes (root, echo, user-agent) work purely in memory. The file
//! routes go through [`files::FileStore`], which owns the containment check.

pub mod files;

use crate::error::HttpError;
use crate::http::encoding;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

pub use files::FileStore;

/// `GET /`
pub fn root() -> Response {
    Response::empty(StatusCode::Ok)
}

/// `GET /echo/{msg}`, gzip-encoded when the client accepts it.
pub fn echo(req: &Request, message: &[u8]) -> Result<Response, HttpError> {
    if req.accepts_gzip() {
        let compressed = encoding::gzip(message)?;
        Ok(Response::gzip_text(StatusCode::Ok, compressed))
    } else {
        Ok(Response::text(StatusCode::Ok, message))
    }
}

/// `GET /user-agent`
pub fn user_agent(req: &Request) -> Response {
    let agent = req.header("user-agent").unwrap_or_default();
    Response::text(StatusCode::Ok, agent)
}

/// `GET /files/{name}`
pub async fn get_file(store: &FileStore, name: &[u8]) -> Result<Response, HttpError> {
    let bytes = store.read(name).await?;
    Ok(Response::octet_stream(bytes))
}

/// `POST /files/{name}`
pub async fn post_file(store: &FileStore, name: &[u8], req: &Request) -> Result<Response, HttpError> {
    let path = store.write(name, &req.body).await?;
    tracing::debug!(path = %path.display(), bytes = req.body.len(), "Stored upload");
    Ok(Response::empty(StatusCode::Created))
}
