//! Typed response dispatch
//!
//! Decodes a raw HTTP result into a typed value by trying an ordered list of
//! guarded handlers.
//!
//! # Overview
//!
//! A handler is a predicate over the response (usually "status code is one of
//! these") paired with a processing function. Handlers compose into a
//! [`Composite`] whose processing step runs the first member whose predicate
//! holds, in declaration order. Callers either check `can_process` before
//! `process`, or use `decode`, which reports [`Error::DispatchExhausted`]
//! instead.
//!
//! [`Error::DispatchExhausted`]: crate::error::Error::DispatchExhausted

mod handlers;
mod types;

pub use handlers::{Composite, Constant, IfStatus};
pub use types::{Handler, RawResponse};
