//! Request payload validation
//!
//! Payload types derive [`validator::Validate`]; the [`Validated`] extractor
//! deserializes the JSON body and runs the rules before the handler sees it.

pub mod extractor;

pub use extractor::Validated;
