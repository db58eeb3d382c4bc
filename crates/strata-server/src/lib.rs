//! The Strata broker: façade, routing, and the HTTP/JSON transport.
//!
//! [`Broker`] composes the storage engine and the metadata stores and
//! exposes the five broker operations (publish, fetch, commit, metadata,
//! health) to whatever transport adapts it. [`http`] is that transport: a
//! thin axum layer that translates JSON requests into façade calls and typed
//! failures into status codes.

pub mod broker;
pub mod error;
pub mod http;
pub mod router;

pub use broker::Broker;
pub use error::{BrokerError, Result};
