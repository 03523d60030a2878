//! Request-level error taxonomy.
//!
//! Every variant except [`HttpError::Io`] maps to a short-form response and
//! is answered on the wire. `Io` is never reported to the client: the
//! connection is logged and torn down instead.

use std::io;
use std::path::PathBuf;

use crate::http::parser::ParseError;
use crate::http::response::{Response, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("malformed request line")]
    MalformedRequest,

    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    #[error("method not allowed on `{0}`")]
    MethodNotAllowed(String),

    #[error("no route for `{0}`")]
    RouteNotFound(String),

    #[error("path `{}` escapes the file root", .0.display())]
    PathEscape(PathBuf),

    #[error("file `{}` not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::MalformedRequest => Some(StatusCode::BadRequest),
            HttpError::UnsupportedMethod(_) | HttpError::MethodNotAllowed(_) => {
                Some(StatusCode::MethodNotAllowed)
            }
            HttpError::RouteNotFound(_)
            | HttpError::PathEscape(_)
            | HttpError::FileNotFound(_) => Some(StatusCode::NotFound),
            HttpError::Io(_) => None,
        }
    }

    /// The short-form response for this error. `None` means the error is
    /// fatal and the connection must close without a response.
    pub fn response(&self) -> Option<Response> {
        self.status().map(Response::short)
    }
}

impl From<ParseError> for HttpError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::InvalidRequestLine => HttpError::MalformedRequest,
        }
    }
}
