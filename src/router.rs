//! Maps (method, path) to a handler.

use crate::error::HttpError;
use crate::handlers::{self, FileStore};
use crate::http::request::{Method, Request};
use crate::http::response::Response;

const ECHO_PREFIX: &[u8] = b"/echo/";
const FILES_PREFIX: &[u8] = b"/files/";

/// A matched route, borrowing the raw dynamic tail of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a [u8]),
    UserAgent,
    Files(&'a [u8]),
}

impl<'a> Route<'a> {
    /// Exact match for `/` and `/user-agent`, prefix match for the rest.
    pub fn match_path(target: &'a [u8]) -> Option<Self> {
        if target == b"/" {
            Some(Route::Root)
        } else if target == b"/user-agent" {
            Some(Route::UserAgent)
        } else if let Some(msg) = target.strip_prefix(ECHO_PREFIX) {
            Some(Route::Echo(msg))
        } else {
            target.strip_prefix(FILES_PREFIX).map(Route::Files)
        }
    }

    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Route::Files(_) => matches!(method, Method::GET | Method::POST),
            _ => *method == Method::GET,
        }
    }
}

/// Shared, read-only routing table. One instance serves every connection.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    /// Runs the handler for `req`.
    pub async fn dispatch(&self, req: &Request) -> Result<Response, HttpError> {
        if let Method::Unsupported(m) = &req.method {
            return Err(HttpError::UnsupportedMethod(m.clone()));
        }

        let route = Route::match_path(&req.target)
            .ok_or_else(|| HttpError::RouteNotFound(req.path.clone()))?;

        if !route.allows(&req.method) {
            return Err(HttpError::MethodNotAllowed(req.path.clone()));
        }

        match (route, &req.method) {
            (Route::Root, _) => Ok(handlers::root()),
            (Route::Echo(msg), _) => handlers::echo(req, msg),
            (Route::UserAgent, _) => Ok(handlers::user_agent(req)),
            (Route::Files(name), Method::POST) => handlers::post_file(&self.files, name, req).await,
            (Route::Files(name), _) => handlers::get_file(&self.files, name).await,
        }
    }

    /// Like [`Router::dispatch`], but answers every non-fatal error with its
    /// short-form response. Only I/O failures come back as `Err`.
    pub async fn respond(&self, req: &Request) -> Result<Response, HttpError> {
        match self.dispatch(req).await {
            Ok(response) => Ok(response),
            Err(e) => match e.response() {
                Some(response) => {
                    tracing::debug!(
                        method = req.method.as_str(),
                        path = %req.path,
                        reason = %e,
                        "Request rejected"
                    );
                    Ok(response)
                }
                None => Err(e),
            },
        }
    }
}
