//! Timescale Information Tool
//!
//! Converts delta times counted from an epoch into Modified Julian Days and
//! prints the calendar date together with the derived rotation quantities.
//!
//! Usage:
//!   cargo run --bin timescale_info -- --since "days since 1858-11-17" 58119.5
//!   cargo run --bin timescale_info -- --epoch gps --standard gps 1198800018

use clap::{ArgAction, Parser};
use timescale::{parse_date_string, Epoch, TimeStandard, Timescale};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Timescale Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Converts delta times into calendar dates, Julian days and Earth rotation angles",
    long_about = None
)]
struct Args {
    /// Units and epoch as "<units> since <date>", overrides --epoch and --scale
    #[arg(long)]
    since: Option<String>,

    /// Epoch name (gps, unix, atlas_sdp, ...) or ISO-8601 date
    #[arg(short, long, default_value = "mjd")]
    epoch: String,

    /// Seconds in one unit of the delta times
    #[arg(short, long, default_value_t = 86400.0)]
    scale: f64,

    /// Time standard of the delta times (utc or gps)
    #[arg(long, default_value = "utc")]
    standard: TimeStandard,

    /// Print only Modified Julian Days
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Delta times to convert
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<f64>,
}

/// Print a labelled value aligned with the other rows
fn print_row(name: &str, value: impl std::fmt::Display) {
    println!("  {:<12} {}", name, value);
}

fn resolve_epoch(args: &Args) -> Result<(Epoch, f64)> {
    match &args.since {
        Some(since) => {
            let (epoch, scale) = parse_date_string(since)?;
            if scale == 0.0 {
                return Err(format!("'{}' has no units", since).into());
            }
            Ok((epoch, scale))
        }
        None => Ok((Epoch::resolve(&args.epoch)?, args.scale)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (epoch, scale) = resolve_epoch(&args)?;

    let ts = Timescale::from_deltatime(args.values.clone(), &epoch, args.standard, scale)?;
    if args.quiet {
        for mjd in ts.mjd() {
            println!("{}", mjd);
        }
        return Ok(());
    }

    println!("Epoch {} ({:?}), {} s per unit", epoch, args.standard, scale);
    println!("-------------------------------------------------------");

    let calendar = ts.to_calendar()?;
    let (utc, t, era, gha, st) = (ts.utc(), ts.t(), ts.era(), ts.gha(), ts.st());
    let (tide, gps_week, besselian) = (ts.tide(), ts.gps_week(), ts.besselian());

    for (i, value) in args.values.iter().enumerate() {
        println!("\n{}:", value);
        print_row("Calendar", calendar[i]);
        print_row("MJD", format!("{:.9}", ts.mjd()[i]));
        print_row("JD", format!("{:.9}", utc[i]));
        print_row("T", format!("{:.12}", t[i]));
        print_row("ERA", format!("{:.9} deg", era[i]));
        print_row("GHA", format!("{:.9} deg", gha[i]));
        print_row("GMST", format!("{:.9} h", 24.0 * st[i]));
        print_row("Besselian", format!("B{:.6}", besselian[i]));
        print_row("GPS week", gps_week[i]);
        print_row("Tide day", tide[i]);
    }

    Ok(())
}
