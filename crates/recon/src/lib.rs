//! `printaudit-recon`: POS sales ledger vs. print production log reconciliation.
//!
//! Pure engine crate: receives pre-loaded tables, returns the comparison,
//! mismatch and orphan sets. No CLI or IO dependencies.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod finance;
pub mod model;
pub mod numeric;
pub mod pages;
pub mod reconcile;
pub mod report;
pub mod summary;

pub use config::AuditConfig;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{
    AuditInput, ComparisonRow, JobId, OrphanProductionRecord, ProductionRecord, ReconResult,
    ReconSummary, SalesRecord, Table,
};
pub use report::{build_report, AuditReport};
