//! Categorical feature encoding.
//!
//! This module owns the mapping from categorical string labels to integer
//! codes and its lifecycle:
//!
//! - [`ColumnEncoder`]: the label↔code table for a single column, populated
//!   exactly once by a fit over the training data.
//! - [`EncoderRegistry`]: one encoder per categorical column plus the fixed
//!   target-label mapping and the fitted feature-column order; the persisted
//!   artifact that keeps training and serving consistent.
//!
//! An out-of-vocabulary value at serving time is not an error: encoding
//! always succeeds and yields the [`UNSEEN_CODE`] sentinel.

pub mod column;
pub mod registry;

pub use column::{ColumnEncoder, ColumnEncoderParams};
pub use registry::{EncoderRegistry, EncoderRegistryParams};

/// Sentinel code returned for any value never observed at fit time.
///
/// Assigned codes are contiguous from 0, so the sentinel can never collide
/// with a real code.
pub const UNSEEN_CODE: i64 = -1;
