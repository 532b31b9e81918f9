//! One-shot bundle sync pipeline: prepare staging, stream the archive
//! download, unpack it to the canonical target path, overlay the local
//! configuration.
//!
//! The steps run strictly in sequence; each depends on the previous step's
//! filesystem output, so ordering alone provides mutual exclusion over the
//! staging tree.

pub mod extract;
pub mod fetch;
pub mod overlay;
pub mod staging;

pub use extract::{extract, ExtractError};
pub use fetch::{fetch, FetchError, ARCHIVE_FILE_NAME};
pub use overlay::{overlay, OverlayError};
pub use staging::{prepare, StagingError};
