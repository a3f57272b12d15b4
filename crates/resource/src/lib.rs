//! Resource loaders for image annotation payloads.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: Loads payloads relative to a base directory
//! - [`DataUriResourceProvider`]: Decodes inline `data:` URIs, delegating
//!   everything else to an optional fallback provider
//!
//! The in-memory provider from burnin-traits is re-exported for convenience.

mod data_uri;
mod filesystem;

pub use data_uri::{DataUri, DataUriResourceProvider};
pub use filesystem::FilesystemResourceProvider;

pub use burnin_traits::InMemoryResourceProvider;
