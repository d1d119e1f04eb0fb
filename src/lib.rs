//! Publishes posts and images to a Ghost site through the Admin API.
//!
//! `GhostClient` wraps the two remote calls (create post, upload image) and
//! the `publish` flow that composes them. The `action` module is the CI glue
//! that turns action inputs into one of those calls and reports the result.

pub mod action;
pub mod api;
pub mod error;
pub mod params;
pub mod report;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::{ClientConfig, GhostClient, PostData, PostInput, PostResult, TagRef, content_type_for};
pub use error::{GhostError, Result};
pub use report::{ActionsReporter, Reporter};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
