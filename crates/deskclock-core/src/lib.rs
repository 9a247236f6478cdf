//! # Deskclock Core Library
//!
//! This library provides the logic behind the deskclock landing page widgets:
//! the fullscreen countdown timer, the draggable physics circle and the
//! timer history log. Rendering is left to a thin adapter (browser, CLI);
//! everything here is plain state driven by injected wall-clock instants.
//!
//! ## Architecture
//!
//! - **Countdown Timer**: A wall-clock-based state machine. The caller passes
//!   `now_ms` to every operation and invokes `tick()` periodically.
//! - **Drag Physics**: Pointer-gesture velocity estimation, frame-rate
//!   independent inertia with spring-back edges, and an eased settle snap.
//! - **History**: Append-only log of finished countdowns with notes.
//! - **Storage**: SQLite key-value persistence and TOML configuration.
//!
//! ## Key Components
//!
//! - [`CountdownTimer`]: Countdown state machine
//! - [`CountdownSession`]: Wires the timer to a [`RecordSink`]
//! - [`DragPhysics`]: Inertial drag simulation
//! - [`TimerHistory`]: Timer record log
//! - [`Database`]: Persistence of timer and history state
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod drag;
pub mod error;
pub mod events;
pub mod history;
pub mod session;
pub mod storage;
pub mod swiper;
pub mod timer;

pub use clock::{format_clock, ClockFormat};
pub use drag::{
    Bounds, DragConfig, DragFrame, DragPhase, DragPhysics, Layout, Rect, ReleaseTarget, Vec2,
};
pub use error::{ConfigError, CoreError, DatabaseError, HistoryError, TimerError};
pub use events::{SessionOutcome, TimerEvent};
pub use history::{DayGroup, RecordSink, TimerHistory, TimerRecord};
pub use session::CountdownSession;
pub use storage::{Config, Database};
pub use swiper::{PageSwiper, SwiperConfig};
pub use timer::{
    format_duration_minutes, CountdownDisplay, CountdownTimer, DurationDial, TimerDuration,
    TimerPhase,
};
