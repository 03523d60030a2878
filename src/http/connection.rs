use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

use crate::error::HttpError;
use crate::http::body::read_body;
use crate::http::parser::parse_request_head;
use crate::http::request::Request;
use crate::http::scanner::read_head;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

pub struct Connection<S> {
    stream: BufStream<S>,
    router: Arc<Router>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>) -> Self {
        Self {
            stream: BufStream::new(stream),
            router,
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests until the client closes, asks to close, sends a
    /// malformed request, or an I/O error occurs. The stream is shut down
    /// on every exit path.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        self.state = ConnectionState::Closed;

        if let Err(e) = self.stream.shutdown().await {
            tracing::trace!(error = %e, "Shutdown after connection end failed");
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = self.read_request().await?;
                }

                ConnectionState::Processing(req) => {
                    let keep_alive = req.keep_alive();
                    let mut response = self.router.respond(req).await.with_context(|| {
                        format!("{} {} failed", req.method.as_str(), req.path)
                    })?;

                    if !keep_alive {
                        response.close_connection();
                    }

                    tracing::info!(
                        method = req.method.as_str(),
                        path = %req.path,
                        status = response.status.as_u16(),
                        keep_alive,
                        "Request served"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("writing response")?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads one request: header block first, then exactly Content-Length
    /// body bytes.
    async fn read_request(&mut self) -> anyhow::Result<ConnectionState> {
        let head = read_head(&mut self.stream)
            .await
            .context("reading request head")?;

        if head.is_empty() {
            tracing::debug!("Client closed connection");
            return Ok(ConnectionState::Closed);
        }

        let mut req = match parse_request_head(&head).map_err(HttpError::from) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request, closing connection");
                let response = e.response().context("malformed request has no response")?;
                return Ok(ConnectionState::Writing(ResponseWriter::new(&response), false));
            }
        };

        let declared = req.content_length();
        req.body = read_body(&mut self.stream, declared)
            .await
            .context("reading request body")?;

        if req.body.len() < declared {
            tracing::warn!(
                method = req.method.as_str(),
                path = %req.path,
                declared,
                received = req.body.len(),
                "Stream ended before full body, continuing with partial body"
            );
        }

        Ok(ConnectionState::Processing(req))
    }
}
