//! Client for a paginated REST user directory (the reqres.in API shape).
//!
//! [`UserDirectoryClient`] fetches single users and drains paginated
//! listings, caching results in a [`ResultCache`] and retrying transient
//! failures through a [`RetryPolicy`].

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod responses;
pub mod retry;
pub mod types;

pub use cache::ResultCache;
pub use client::UserDirectoryClient;
pub use config::Config;
pub use error::{DirectoryError, Result};
pub use retry::RetryPolicy;
pub use types::User;
