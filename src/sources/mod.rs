//! Catalog backends with conditional compilation support.
//!
//! Each backend sits behind its own feature flag so a build can carry only
//! the one it needs.
//!
//! # Feature Flags
//!
//! - `backend-jikan` - Enables the live Jikan backend
//! - `backend-fixture` - Enables the offline fixture backend
//! - `all-backends` - Enables both (default)
//!
//! # Examples
//!
//! Build with only the offline catalog:
//! ```bash
//! cargo build --no-default-features --features backend-fixture
//! ```
//!
//! # Available Backends
//!
//! - [`JikanCatalog`] - Jikan v4 / MyAnimeList metadata (requires `backend-jikan`)
//! - [`FixtureCatalog`] - built-in twelve-series catalog (requires `backend-fixture`)

#[cfg(feature = "backend-jikan")]
pub mod jikan;

#[cfg(feature = "backend-fixture")]
pub mod fixture;

#[cfg(feature = "backend-jikan")]
pub use jikan::JikanCatalog;

#[cfg(feature = "backend-fixture")]
pub use fixture::FixtureCatalog;
