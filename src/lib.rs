//! Ad-hoc profiling: start a timer, drop named marks along the way, stop it,
//! and ask for elapsed times and mark statistics.
mod clock;
mod error;
mod stats;
mod timer;

pub use crate::timer::{Mark, Timer};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use stats::{Snapshot, Stats};
