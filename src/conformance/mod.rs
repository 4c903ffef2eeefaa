//! Fixed scenario battery every backend must pass identically, plus the
//! runner that records structured failures without aborting the battery.

mod battery;
mod report;

pub use battery::run_battery;
pub use report::{Runner, ScenarioFailure};
