use std::time::Duration;

use clap::Subcommand;
use deskclock_core::{CountdownSession, TimerEvent, TimerHistory, TimerPhase};

use super::{now_ms, Workspace};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Set the countdown length (rounded to 5s, clamped to 5s..60min)
    Configure {
        /// Length in minutes, fractions allowed (e.g. 0.5)
        minutes: f64,
    },
    /// Start the countdown
    Start,
    /// Pause a running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop and reset; an unfinished countdown is logged to history
    Stop,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground until it completes or Ctrl-C
    Run {
        /// Configure this length first (only when idle)
        #[arg(long)]
        minutes: Option<f64>,
    },
}

fn print_event(event: &TimerEvent) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Print the event, or the current snapshot when the command was a no-op.
fn print_outcome(
    session: &CountdownSession<TimerHistory>,
    event: Option<TimerEvent>,
    now: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_event(&event),
        None => {
            tracing::info!(phase = ?session.timer().phase(), "command ignored in current phase");
            print_event(&session.timer().snapshot(now))
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;
    let mut session = ws.load_session()?;
    let now = now_ms();

    // Catch up with wall-clock time first so a countdown that ran out while
    // no command was running is completed and logged.
    let caught_up = if session.timer().phase() == TimerPhase::Running {
        session
            .tick(now)
            .filter(|e| matches!(e, TimerEvent::TimerCompleted { .. }))
    } else {
        None
    };

    match action {
        TimerAction::Configure { minutes } => {
            if session.timer().phase() == TimerPhase::Completed {
                // Already logged on completion; just clear it.
                session.stop(now);
            }
            if session.timer().phase() != TimerPhase::Idle {
                ws.save_session(&session)?;
                return Err(format!(
                    "cannot configure while {:?}; stop the countdown first",
                    session.timer().phase()
                )
                .into());
            }
            let event = session.configure(minutes);
            print_outcome(&session, event, now)?;
        }
        TimerAction::Start => {
            let event = session.start(now);
            print_outcome(&session, event, now)?;
        }
        TimerAction::Pause => {
            let event = session.pause(now);
            print_outcome(&session, event, now)?;
        }
        TimerAction::Resume => {
            let event = session.resume(now);
            print_outcome(&session, event, now)?;
        }
        TimerAction::Stop => {
            let event = session.stop(now);
            print_outcome(&session, event, now)?;
        }
        TimerAction::Status => {
            print_event(&session.timer().snapshot(now))?;
            if let Some(event) = &caught_up {
                // Also output completion event
                print_event(event)?;
            }
        }
        TimerAction::Run { minutes } => {
            if let Some(minutes) = minutes {
                if session.timer().phase() == TimerPhase::Idle {
                    session.configure(minutes);
                }
            }
            let interval = Duration::from_millis(ws.config.timer.tick_interval_ms.max(10));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(drive(&ws, &mut session, interval))?;
        }
    }

    ws.save_session(&session)?;
    Ok(())
}

/// Tick the countdown until it completes or the user interrupts it. Each
/// display change is printed as one JSON line.
async fn drive(
    ws: &Workspace,
    session: &mut CountdownSession<TimerHistory>,
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = now_ms();
    let started = match session.timer().phase() {
        TimerPhase::Idle | TimerPhase::Completed => session.start(now),
        TimerPhase::Paused => session.resume(now),
        TimerPhase::Running => None,
    };
    if let Some(event) = started {
        println!("{}", serde_json::to_string(&event)?);
    }
    // Persist the running state so other commands can see it.
    ws.save_session(session)?;

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = session.tick(now_ms()) {
                    println!("{}", serde_json::to_string(&event)?);
                    if matches!(event, TimerEvent::TimerCompleted { .. }) {
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                if let Some(event) = session.stop(now_ms()) {
                    println!("{}", serde_json::to_string(&event)?);
                }
                break;
            }
        }
    }
    Ok(())
}
