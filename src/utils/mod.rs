//! Utility functions shared by the collection commands.
//!
//! ## Components
//!
//! - **Summary**: JSON report written next to the exported datasets
//!
//! ```no_run
//! use tsw_connect::utils::summary::write_collection_summary;
//! # use tsw_connect::utils::summary::SessionSummary;
//! # use std::path::Path;
//!
//! # fn example(summary: &SessionSummary) -> anyhow::Result<()> {
//! write_collection_summary(Path::new("data/collection_summary.json"), "sim-rig", summary)?;
//! # Ok(())
//! # }
//! ```

/// Collection summary generation and reporting
pub mod summary;
