//! Retro Buddy - derived-data engine for a sprint retrospective dashboard
//!
//! Retro Buddy turns two raw record sets fetched from a backend (sprints and
//! calendar events) into chart-ready view-models: velocity, work breakdown,
//! member comparison, meeting costs and insights. It also keeps a local,
//! append-only kudos feed.
//!
//! Data flows one way: data source → raw records → selection state +
//! aggregation → view-models. Derived data is recomputed on every read.
//!
//! ## Modules
//!
//! - **Loading**: [`source`] backends and the joint [`loader`]
//! - **Aggregation**: pure functions in [`analytics`]
//! - **Session state**: [`selection`], [`kudos`] and the [`dashboard`] that owns them
//! - **Output**: [`snapshot`] JSON documents

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod kudos;
pub mod loader;
pub mod selection;
pub mod snapshot;
pub mod source;
pub mod types;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardView};
pub use error::DashboardError;
pub use kudos::{KudosDraft, KudosFilters, KudosStore, KudosValidationError, ValidKudos};
pub use loader::{load_dashboard_data, DashboardData};
pub use selection::SelectionState;
pub use snapshot::{DashboardSnapshot, SnapshotEncoder};
pub use source::{DataSource, FixtureSource, HttpSource};

/// Version embedded in every snapshot
pub const RETRO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for snapshots
pub const PRODUCER_NAME: &str = "retro-buddy";
