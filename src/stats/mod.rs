//! # Windowed Statistics Core
//!
//! Real-time sum/avg/min/max/count over every observation in a trailing,
//! fixed-length time window.
//!
//! ## Architecture
//!
//! ```text
//! record(value, ts) ──► WindowBuffer (write lock) ──► rotate + merge into slot
//! summary()         ──► WindowBuffer (read lock)  ──► merge valid slots
//! ```
//!
//! - `aggregate` - Mergeable sum/max/min/count value
//! - `window` - Ring of per-bucket aggregates with lazy eviction
//! - `clock` - Injectable time source
//! - `error` - Construction and future-timestamp errors

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod window;

pub use aggregate::Aggregate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::WindowError;
pub use window::WindowBuffer;
