//! Access layer for key-value records.
//!
//! - **Record**: A key-value pair with a length-prefixed binary encoding that
//!   fits in a single page slot
//!
//! The storage engine in [`crate::database`] decodes every slot it scans
//! through this layer.

pub mod record;

pub use record::{Record, RECORD_HEADER_SIZE};
