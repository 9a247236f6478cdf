use clap::Subcommand;
use deskclock_core::{Bounds, Config, DragPhase, DragPhysics, Vec2};

/// Simulated frame spacing, 60 fps.
const FRAME_STEP_MS: i64 = 16;
const MAX_FRAMES: usize = 10_000;

#[derive(Subcommand)]
pub enum DragAction {
    /// Fling the element and print every animation frame as a JSON line
    Simulate {
        /// Release velocity, px/frame (clamped to the configured maximum)
        #[arg(long, allow_hyphen_values = true)]
        vx: f64,
        #[arg(long, allow_hyphen_values = true)]
        vy: f64,
        /// Offset the element is dragged to before release (elastic past
        /// the bounds)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: f64,
        /// Half-width of the travel bounds (unbounded when omitted)
        #[arg(long)]
        half_width: Option<f64>,
        /// Half-height of the travel bounds (defaults to the half-width)
        #[arg(long)]
        half_height: Option<f64>,
    },
}

pub fn run(action: DragAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DragAction::Simulate {
            vx,
            vy,
            x,
            y,
            half_width,
            half_height,
        } => {
            let config = Config::load_or_default().drag_config();
            let bounds = match (half_width, half_height) {
                (None, None) => Bounds::unbounded(),
                (w, h) => {
                    let w = w.or(h).unwrap_or_default();
                    Bounds::symmetric(w, h.unwrap_or(w))
                }
            };
            let mut physics = DragPhysics::new(config, bounds);

            // Carry the element to the starting offset, then let go.
            let mut now = 0;
            physics.begin_drag(Vec2::ZERO, now);
            physics.update_drag(Vec2::new(x, y), now);
            let mut frame = physics.fling(Vec2::new(vx, vy), now);
            println!("{}", serde_json::to_string(&frame)?);
            let mut frames = 0;
            while frame.phase != DragPhase::Resting && frames < MAX_FRAMES {
                now += FRAME_STEP_MS;
                frame = physics.frame(now);
                println!("{}", serde_json::to_string(&frame)?);
                frames += 1;
            }
            if frame.phase != DragPhase::Resting {
                return Err(format!("motion did not settle within {MAX_FRAMES} frames").into());
            }
        }
    }
    Ok(())
}
