//! Server module for building the HTTP server
//!
//! `ServerBuilder` collects the stores and the auth provider, registers the
//! article and user resources and exposes them over REST.

pub mod builder;
pub mod exposure;
pub mod host;
pub mod registry;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use registry::{ResourceDescriptor, ResourceRegistry};
