//! Handler implementations
//!
//! Two primitives (`Constant`, `IfStatus`) and the first-match `Composite`.

use super::types::{Handler, RawResponse};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fmt;

type Block<T> = Box<dyn Fn(&RawResponse) -> Result<T> + Send + Sync>;
type Filter = Box<dyn Fn(&RawResponse) -> bool + Send + Sync>;

// ============================================================================
// Constant
// ============================================================================

/// Accepts every response and yields a fixed value
#[derive(Debug, Clone)]
pub struct Constant<T> {
    value: T,
}

impl<T> Constant<T> {
    /// Create a constant handler
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone + Send + Sync> Handler<T> for Constant<T> {
    fn can_process(&self, _response: &RawResponse) -> bool {
        true
    }

    fn process(&self, _response: &RawResponse) -> Result<T> {
        Ok(self.value.clone())
    }
}

// ============================================================================
// IfStatus
// ============================================================================

/// Accepts responses whose status is in a fixed set
///
/// An optional filter narrows the guard further, e.g. on payload shape.
pub struct IfStatus<T> {
    codes: BTreeSet<u16>,
    filter: Option<Filter>,
    block: Block<T>,
}

impl<T> IfStatus<T> {
    /// Handle a single status code
    pub fn new<F>(code: u16, block: F) -> Self
    where
        F: Fn(&RawResponse) -> Result<T> + Send + Sync + 'static,
    {
        Self::any_of([code], block)
    }

    /// Handle any of several status codes
    pub fn any_of<C, F>(codes: C, block: F) -> Self
    where
        C: IntoIterator<Item = u16>,
        F: Fn(&RawResponse) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            codes: codes.into_iter().collect(),
            filter: None,
            block: Box::new(block),
        }
    }

    /// Additionally require `filter` to accept the response
    #[must_use]
    pub fn with_filter<P>(mut self, filter: P) -> Self
    where
        P: Fn(&RawResponse) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Status codes this handler accepts
    pub fn codes(&self) -> &BTreeSet<u16> {
        &self.codes
    }
}

impl<T: DeserializeOwned + 'static> IfStatus<T> {
    /// Decode the body as JSON when the status matches
    pub fn json(code: u16) -> Self {
        Self::new(code, |response| {
            serde_json::from_slice(&response.body)
                .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
        })
    }
}

impl<T: 'static> IfStatus<T> {
    /// Turn any of `codes` into an `Error::HttpStatus` carrying the body
    pub fn failure<C>(codes: C) -> Self
    where
        C: IntoIterator<Item = u16>,
    {
        Self::any_of(codes, |response| {
            Err(Error::http_status(response.status, response.text()))
        })
    }
}

impl<T> Handler<T> for IfStatus<T> {
    fn can_process(&self, response: &RawResponse) -> bool {
        self.codes.contains(&response.status)
            && self.filter.as_ref().map_or(true, |filter| filter(response))
    }

    fn process(&self, response: &RawResponse) -> Result<T> {
        (self.block)(response)
    }
}

impl<T> fmt::Debug for IfStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IfStatus")
            .field("codes", &self.codes)
            .field("has_filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Composite
// ============================================================================

/// Ordered handler list with first-match-wins semantics
pub struct Composite<T> {
    components: Vec<Box<dyn Handler<T>>>,
}

impl<T> Composite<T> {
    /// Build a composite from handlers in priority order
    pub fn new(components: Vec<Box<dyn Handler<T>>>) -> Self {
        Self { components }
    }

    /// Append a handler with the lowest priority so far
    #[must_use]
    pub fn with<H>(mut self, handler: H) -> Self
    where
        H: Handler<T> + 'static,
    {
        self.components.push(Box::new(handler));
        self
    }

    /// Number of member handlers
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there are no member handlers
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn first_match(&self, response: &RawResponse) -> Option<&dyn Handler<T>> {
        self.components
            .iter()
            .find(|component| component.can_process(response))
            .map(|component| component.as_ref())
    }
}

impl<T> Default for Composite<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Handler<T> for Composite<T> {
    fn can_process(&self, response: &RawResponse) -> bool {
        self.components
            .iter()
            .any(|component| component.can_process(response))
    }

    /// Runs the first member that accepts the response.
    ///
    /// # Panics
    ///
    /// Panics when no member accepts the response; `can_process` must be
    /// checked first.
    fn process(&self, response: &RawResponse) -> Result<T> {
        match self.first_match(response) {
            Some(component) => component.process(response),
            None => panic!(
                "no handler accepts HTTP status {}; was can_process called?",
                response.status
            ),
        }
    }

    fn decode(&self, response: &RawResponse) -> Result<T> {
        match self.first_match(response) {
            Some(component) => component.process(response),
            None => Err(Error::DispatchExhausted {
                status: response.status,
            }),
        }
    }
}

impl<T> fmt::Debug for Composite<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("components", &self.components.len())
            .finish()
    }
}
