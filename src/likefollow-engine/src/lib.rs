//! Like Follow Engine - content request resolution.
//!
//! This crate contains the transport-independent core:
//! - Reference tables for platforms, tones and models
//! - Per-model credential resolution
//! - The `GenerationProvider` capability and its placeholder implementation
//! - The content request resolver and its error taxonomy
//!
//! NOTE: This crate should NOT contain any HTTP code.
//! Routing and status mapping belong in likefollow-app-server.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod provider;
pub mod resolver;

pub use catalog::{
    Catalog, CatalogConfig, DEFAULT_CHARACTER_LIMIT, ModelDescriptor, Platform, Tone,
};
pub use credentials::CredentialStore;
pub use error::{CatalogError, ProviderError, ResolveError, Result};
pub use provider::{
    Generation, GenerationProvider, GenerationRequest, PlaceholderProvider, ProviderRegistry,
};
pub use resolver::{ContentRequest, ContentResolver, ContentResult};
