//! Inertial drag simulation for the draggable circle.
//!
//! A gesture goes `Dragging -> (Inertia | Snapping) -> Resting`. The adapter
//! forwards pointer events to [`DragPhysics`] and calls [`DragPhysics::frame`]
//! from its animation-frame callback until a `Resting` frame comes back.

mod easing;
mod geometry;
mod physics;
mod velocity;

pub use easing::{ease_out_back, AnimPhase, SnapAnimation, EASE_OVERSHOOT};
pub use geometry::{Bounds, Layout, Rect, Vec2};
pub use physics::{
    elastic_offset, elastic_source, spring_force, DragConfig, DragFrame, DragPhase, DragPhysics,
    ReleaseTarget, FRAME_MS,
};
pub use velocity::{PointerSample, VelocityTracker};
