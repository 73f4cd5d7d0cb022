//! Run-level reporting.

/// JSON run summary and the end-of-run failure listing
pub mod summary;
