use chrono::Local;
use clap::Subcommand;
use serde::Serialize;

use super::Workspace;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List timer records, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a record by ID
    Delete {
        /// Record ID
        id: String,
    },
    /// Delete every record
    Clear,
    /// Attach a note to a record (an empty note removes it)
    Note {
        /// Record ID
        id: String,
        /// Note text
        text: String,
    },
    /// Print totals as JSON
    Stats,
}

#[derive(Serialize)]
struct HistoryStats {
    total: usize,
    completed: usize,
    stopped_early: usize,
    total_minutes: f64,
    first_started_at: Option<String>,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;
    let mut history = ws.load_history()?;

    match action {
        HistoryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(history.records())?);
                return Ok(());
            }
            if history.is_empty() {
                println!("No timer records yet.");
                return Ok(());
            }
            let today = Local::now().date_naive();
            for group in history.group_by_day(today, &Local) {
                println!("{}", group.label);
                for record in group.records {
                    let started = record.start_time.with_timezone(&Local).format("%H:%M");
                    let status = if record.is_completed { "done" } else { "stopped" };
                    print!(
                        "  {started}  {}  {status:<7}  {}",
                        record.formatted_duration(),
                        record.id
                    );
                    match &record.note {
                        Some(note) => println!("  {note}"),
                        None => println!(),
                    }
                }
            }
        }
        HistoryAction::Delete { id } => {
            let removed = history.delete(&id)?;
            ws.db.save_history(&history)?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
        HistoryAction::Clear => {
            let count = history.len();
            history.clear();
            ws.db.save_history(&history)?;
            println!("cleared {count} records");
        }
        HistoryAction::Note { id, text } => {
            history.set_note(&id, &text)?;
            ws.db.save_history(&history)?;
            if let Some(record) = history.get(&id) {
                println!("{}", serde_json::to_string_pretty(record)?);
            }
        }
        HistoryAction::Stats => {
            let completed = history.completed_count();
            let stats = HistoryStats {
                total: history.len(),
                completed,
                stopped_early: history.len() - completed,
                total_minutes: history.records().iter().map(|r| r.duration_minutes).sum(),
                first_started_at: history.first_started_at().map(|t| t.to_rfc3339()),
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
