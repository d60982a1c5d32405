//! Scrapes exercise listings from a paginated fitness site and reconciles the
//! resulting CSV tables.
//!
//! The crate is split into small stages that mirror the data flow:
//! fetch ([`fetch`]) -> extract ([`extract`]) -> paginate ([`pager`]), then
//! the table transforms in [`reconcile`] and [`enrich`]. [`pipeline`] wires
//! each stage to files on disk.

pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pager;
pub mod pipeline;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod table;

pub use config::{DataPaths, ScrapeConfig};
pub use error::{FetchError, ScrapeError, TableError};
pub use record::ExerciseRecord;
pub use table::Table;
