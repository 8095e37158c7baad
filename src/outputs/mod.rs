//! Output files written at the end of a run.
//!
//! # Submodules
//!
//! - [`table`]: CSV table of every article plus the trailing summary row
//! - [`summary`]: Plain-text copy of the summary
//!
//! Both files are overwritten on each run.

pub mod summary;
pub mod table;
