//! Error types and result handling for Yomu operations.
//!
//! Every fallible operation returns a [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Transport**: the request never produced an HTTP response
//! - **Upstream**: the metadata API answered with a non-success status
//! - **Rate limiting**: the API kept answering 429 after every retry
//! - **Not found**: a single-record lookup had no match
//! - **JSON / Parse**: the response body did not have the expected shape
//! - **Config**: an invalid client configuration
//!
//! List operations on [`Library`](crate::Library) never surface these; they
//! collapse to an empty listing. Single-record lookups propagate them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use yomu::{Error, Library};
//!
//! # async fn example() {
//! let library = Library::jikan();
//!
//! match library.series("manga-2").await {
//!     Ok(series) => println!("{}", yomu::accessors::title(&series.title, "en")),
//!     Err(Error::NotFound(msg)) => println!("missing: {}", msg),
//!     Err(Error::RateLimited) => println!("slow down"),
//!     Err(e) => println!("other error: {}", e),
//! }
//! # }
//! ```

use thiserror::Error;

/// Type alias for Results with Yomu errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all catalog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP client failed before a response arrived.
    ///
    /// Connection refusals, DNS failures, TLS errors and transport timeouts
    /// all land here. These are never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status other than 429.
    #[error("Upstream error: HTTP {status}")]
    Upstream { status: u16 },

    /// The upstream answered 429 on the initial attempt and on every retry.
    #[error("Rate limited by upstream after all retries")]
    RateLimited,

    /// A single-record lookup had no match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yomu::Error;
    ///
    /// let error = Error::not_found("Series with ID 'manga-0'");
    /// assert!(error.to_string().contains("manga-0"));
    /// ```
    #[error("Not found: {0}")]
    NotFound(String),

    /// The body was not valid JSON, or not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data that parsed as JSON but could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid [`ClientConfig`](crate::config::ClientConfig).
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns the upstream HTTP status carried by this error, if any.
    ///
    /// ```rust
    /// use yomu::Error;
    ///
    /// assert_eq!(Error::Upstream { status: 503 }.status(), Some(503));
    /// assert_eq!(Error::RateLimited.status(), Some(429));
    /// assert_eq!(Error::parse("bad").status(), None);
    /// ```
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status } => Some(*status),
            Error::RateLimited => Some(429),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
