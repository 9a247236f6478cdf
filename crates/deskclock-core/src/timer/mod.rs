mod dial;
mod display;
mod duration;
mod engine;

pub use dial::{DurationDial, SECONDS_PER_PIXEL};
pub use display::{ceil_secs, format_duration_minutes, CountdownDisplay};
pub use duration::{TimerDuration, DURATION_STEP_MS, MAX_DURATION_MS, MIN_DURATION_MS};
pub use engine::{CountdownTimer, TimerPhase};
