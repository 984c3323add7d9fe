//! Extract NBA reference data (teams, games, players, box-score lines) from
//! the API-Sports basketball API, normalize it into four flat tables and load
//! them into Postgres.

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod rate_limit;
pub mod raw;
pub mod sentinel;
pub mod sink;
pub mod table;

pub use error::PipelineError;
pub use pipeline::{run, Dataset, Extractor, PassReport, RunSummary};
