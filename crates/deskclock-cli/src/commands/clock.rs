use chrono::Local;
use clap::Args;
use deskclock_core::{format_clock, ClockFormat, Config};

#[derive(Args)]
pub struct ClockArgs {
    /// Hour format: 24h or 12h (defaults to the configured format)
    #[arg(long)]
    format: Option<ClockFormat>,
    /// Switch the saved format to the next one and print it
    #[arg(long, conflicts_with = "format")]
    toggle: bool,
}

pub fn run(args: ClockArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if args.toggle {
        config.clock.format = config.clock.format.next();
        config.save()?;
        println!("{}", config.clock.format);
        return Ok(());
    }
    let format = args.format.unwrap_or(config.clock.format);
    println!("{}", format_clock(&Local::now(), format));
    Ok(())
}
