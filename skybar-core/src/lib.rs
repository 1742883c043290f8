//! Core library for the `skybar` status-line tool.
//!
//! This crate defines:
//! - Forecast issuance (base time) resolution
//! - Configuration loading
//! - The village forecast source abstraction and its KMA client
//! - Snapshot selection and status-line rendering
//!
//! It is used by `skybar-cli`, but can also be embedded in other bar integrations.

pub mod base_time;
pub mod condition;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod output;
pub mod provider;

pub use base_time::{BaseTime, resolve};
pub use condition::{Condition, ConditionStyle};
pub use config::Config;
pub use error::FetchError;
pub use fetcher::ForecastFetcher;
pub use model::{ForecastItem, GridLocation, Snapshot};
pub use output::{DiagnosticStream, report};
pub use provider::{ForecastQuery, ForecastSource, KmaClient};
