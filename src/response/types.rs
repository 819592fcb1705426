//! Response types and the handler trait
//!
//! Defines the raw transport result and the guarded-handler abstraction.

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::HeaderMap;

/// A transport result: status, headers and the undecoded body
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response payload
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response with a status and body and no headers
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a response with headers
    pub fn with_headers(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Body as (lossy) UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A predicate-guarded response processor
pub trait Handler<T>: Send + Sync {
    /// Whether this handler accepts the response
    fn can_process(&self, response: &RawResponse) -> bool;

    /// Produce the typed result
    ///
    /// Calling this for a response that `can_process` rejects is a contract
    /// violation. Use [`Handler::decode`] when that has not been checked.
    fn process(&self, response: &RawResponse) -> Result<T>;

    /// Check the guard, then process
    fn decode(&self, response: &RawResponse) -> Result<T> {
        if !self.can_process(response) {
            return Err(Error::DispatchExhausted {
                status: response.status,
            });
        }
        self.process(response)
    }
}

impl<T, H: Handler<T> + ?Sized> Handler<T> for Box<H> {
    fn can_process(&self, response: &RawResponse) -> bool {
        (**self).can_process(response)
    }

    fn process(&self, response: &RawResponse) -> Result<T> {
        (**self).process(response)
    }
}
