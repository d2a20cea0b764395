//! RDL ETL Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Schema-driven batch loader for raw delimited data.
//!
//! The pipeline walks a data directory tree, routes every file to a target
//! table named after its parent directory, provisions the table in the
//! target store under the raw landing namespace, and bulk-appends the file's
//! rows under the externally supplied column schema.
//!
//! # Modules
//!
//! - [`catalog`]: schema catalog loading and table descriptors
//! - [`engine`]: the engine's closed column type system and cell coercion
//! - [`provision`]: idempotent table creation against the target store
//! - [`discover`]: recursive file discovery and table routing
//! - [`load`]: per-file read-and-append executor
//! - [`session`]: run lifecycle and scratch-space cleanup
//! - [`config`]: environment-driven configuration
//!
//! # Example
//!
//! ```no_run
//! use rdl_etl::{catalog::SchemaCatalog, config::Config, discover, load, session::Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let catalog = SchemaCatalog::load(&config.pipeline.schema_source)?;
//!     let session = Session::start(&config).await?;
//!     for routed in discover::discover(&config.pipeline.data_dir) {
//!         let _ = load::process(&session, &config, &catalog, &routed).await;
//!     }
//!     session.stop().await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod discover;
pub mod engine;
pub mod load;
pub mod provision;
pub mod session;
