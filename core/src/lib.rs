//! Core of the consent console tooling.
//!
//! # Overview
//! - `paginator`: page and navigation windows for the console's case lists.
//! - `client`: builds and parses requests for the institutions resource
//!   without touching the network (host-does-IO pattern).
//! - `import`: rate-limited bulk creation of institutions, one per input
//!   line, driven through a caller-supplied `Transport`.
//!
//! # Design
//! - The paginator is pure: the view owns the lists and the `ViewState`.
//! - `InstitutionClient` is stateless apart from base URL and token.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod import;
pub mod log;
pub mod paginator;
pub mod rate_limit;
pub mod types;

pub use client::InstitutionClient;
pub use error::{ApiError, ImportError, RateConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use import::{ImportOutcome, ImportSummary, Importer, RunStatus};
pub use log::{ImportLog, TracingLog};
pub use paginator::{Lists, Paginator, ViewState};
pub use rate_limit::{RateConfig, TokenBucket};
pub use types::{CreateInstitution, Institution};
