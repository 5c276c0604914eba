//! HTTP transport abstraction used by the request pipeline.
//!
//! The pipeline only sees [`TransportRequest`], [`TransportResponse`] and the
//! [`TransportError`] taxonomy, so retry eligibility never depends on error
//! message text. [`ReqwestTransport`] is the production implementation.

use std::future::Future;
use std::io;

use reqwest::{header::HeaderMap, Method, StatusCode};

use crate::TransportError;

/// A fully-built HTTP request.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// A buffered HTTP response.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one HTTP request and buffers the response.
///
/// Implementations classify their failures into [`TransportError`]; the
/// caller decides whether to retry. Deadlines are enforced by the caller.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client, e.g. one configured with a proxy.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .inner
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    match io_error_kind(&err) {
        Some(io::ErrorKind::TimedOut) => TransportError::ConnectionTimeout(Box::new(err)),
        Some(
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof,
        ) => TransportError::ConnectionReset(Box::new(err)),
        _ if is_hang_up(&err) => TransportError::ConnectionReset(Box::new(err)),
        _ => TransportError::Other(Box::new(err)),
    }
}

/// Peer closed the connection before a complete response arrived.
///
/// hyper reports this without an underlying `io::Error`.
fn is_hang_up(err: &(dyn std::error::Error + 'static)) -> bool {
    find_source::<hyper::Error>(err)
        .is_some_and(|hyper_err| hyper_err.is_incomplete_message() || hyper_err.is_canceled())
}

fn io_error_kind(err: &(dyn std::error::Error + 'static)) -> Option<io::ErrorKind> {
    find_source::<io::Error>(err).map(io::Error::kind)
}

/// Finds the first `E` in the source chain, excluding `err` itself.
fn find_source<'a, E: std::error::Error + 'static>(
    err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a E> {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(found) = inner.downcast_ref::<E>() {
            return Some(found);
        }
        source = inner.source();
    }
    None
}
