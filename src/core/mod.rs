//! Build service access.
//!
//! [`RequestSource`] is the seam between the report logic and the network:
//! the CLI only needs something that turns a request id into a [`Request`].

mod client;
pub mod xml;

use color_eyre::Result;

use crate::state::Request;

pub use client::ObsClient;

/// Anything that can fetch a request, including its package snapshots.
pub trait RequestSource {
    /// Fetch the request with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be fetched or parsed.
    fn fetch_request(&self, id: &str) -> Result<Request>;
}
