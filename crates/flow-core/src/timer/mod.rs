mod clock;
mod engine;
mod mode;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TickSubscription, TimerEngine, TimerState};
pub use mode::{Durations, TimerMode};
