//! # trioexplorer
//!
//! Command-line client library for the clinical-notes Search API.
//!
//! The crate turns CLI flags into requests against a fixed REST surface and
//! renders the JSON responses as tables, JSON, or CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │            CLI Layer                │  Argument types, dispatcher, handlers
//! ├─────────────────────────────────────┤
//! │            API Layer                │  Request client, typed query params
//! ├─────────────────────────────────────┤
//! │           Core Layer                │  Auth resolver, filter compiler, context
//! ├─────────────────────────────────────┤
//! │         Storage Layer               │  Config file, .env loading, API key
//! ├─────────────────────────────────────┤
//! │   Display / Utils Layer             │  Table, CSV, JSON output; helpers
//! └─────────────────────────────────────┘
//! ```
//!
//! Every failure is returned as an [`AppError`]; the binary maps it to a
//! single message on stderr and exit status 1.

pub use error::AppError;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{ApiError, AppError};

    pub use crate::api::client::SearchClient;
    pub use crate::api::params::{QueryParams, SearchParams};

    pub use crate::core::auth::{AuthHeaders, resolve_auth_headers};
    pub use crate::core::context::AppContext;
    pub use crate::core::filters::{FilterExpression, NamedFilters, Operator, compile};

    pub use crate::storage::config::Config;
}

/// Command-line interface: argument types, dispatcher and command handlers
pub mod cli;

/// Business logic: auth resolution, filter compilation, run context
pub mod core;

/// Configuration file, environment files and API key lookup
pub mod storage;

/// HTTP client for the Search API and its request parameter types
pub mod api;

/// Output formatting: tables, CSV and JSON
pub mod display;

/// Error hierarchy with user-facing messages
pub mod error;

/// Shared helpers (logging, validation, text)
pub mod utils;

pub type Result<T> = std::result::Result<T, AppError>;
