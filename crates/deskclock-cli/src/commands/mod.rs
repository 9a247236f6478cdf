pub mod clock;
pub mod config;
pub mod drag;
pub mod history;
pub mod timer;

use deskclock_core::error::Result;
use deskclock_core::{Config, CountdownSession, CountdownTimer, Database, TimerHistory};

/// Wall-clock now in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Everything a countdown command needs, loaded from the data directory.
pub struct Workspace {
    pub db: Database,
    pub config: Config,
}

impl Workspace {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self { db, config })
    }

    pub fn load_history(&self) -> Result<TimerHistory> {
        Ok(self.db.load_history(self.config.history.max_records)?)
    }

    /// Stored countdown and history, or a fresh countdown at the configured
    /// default length.
    pub fn load_session(&self) -> Result<CountdownSession<TimerHistory>> {
        let timer = match self.db.load_timer()? {
            Some(timer) => timer,
            None => {
                let mut timer = CountdownTimer::default();
                timer.configure(self.config.timer.default_minutes);
                timer
            }
        };
        Ok(CountdownSession::new(timer, self.load_history()?))
    }

    pub fn save_session(&self, session: &CountdownSession<TimerHistory>) -> Result<()> {
        self.db.save_timer(session.timer())?;
        self.db.save_history(session.sink())?;
        Ok(())
    }
}
