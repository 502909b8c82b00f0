//! `slots` CLI — compute bookable appointment start times from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print the candidate grid for the default 09:00-17:00 policy
//! slots grid
//!
//! # Grid for custom hours in 15-minute steps
//! slots grid --open 10:00 --close 18:00 --step 15
//!
//! # Bookable slots for a request (stdin → stdout)
//! cat request.json | slots available
//!
//! # Same, with a policy file and output to a file
//! slots available -i request.json -c policy.json -o slots.json
//!
//! # Use the salon's weekly opening hours and lead time
//! slots schedule -i request.json -c salon.json --now 2026-03-16T10:00
//! ```
//!
//! A request document looks like:
//!
//! ```json
//! {
//!   "date": "2026-03-16",
//!   "service": { "durationMinutes": 60 },
//!   "appointments": [ { "date": "2026-03-16", "time": "10:00:00", "duration_minutes": 45 } ]
//! }
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` (e.g. `RUST_LOG=slot_engine=trace`) or
//! pass `-v` / `-vv` to see why slots were rejected.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use slot_engine::records::{self, RawAppointment, RawService};
use slot_engine::{AvailabilityCalculator, SalonSchedule, SlotPolicy, TimeOfDay};
use std::io::{self, Read, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Compute bookable appointment slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every candidate start time for the policy
    Grid {
        #[command(flatten)]
        policy: PolicyArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Compute bookable slots for one date under a fixed policy
    Available {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        policy: PolicyArgs,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Compute bookable slots using a salon's weekly opening hours and lead time
    Schedule {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Salon JSON file with opening_hours and lead_time_hours
        #[arg(short, long)]
        config: String,
        /// Current salon-local time, e.g. 2026-03-16T10:00 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
        /// IANA timezone used to read the system clock
        #[arg(long, default_value = "Europe/Amsterdam")]
        timezone: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Args)]
struct PolicyArgs {
    /// Policy JSON file (open, close, granularity_minutes)
    #[arg(short, long)]
    config: Option<String>,
    /// Opening time, HH:MM
    #[arg(long)]
    open: Option<String>,
    /// Closing time, HH:MM
    #[arg(long)]
    close: Option<String>,
    /// Minutes between candidate start times
    #[arg(long)]
    step: Option<u32>,
    /// Duration for services and appointments that carry none
    #[arg(long)]
    default_duration: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// JSON array of "HH:MM" strings
    Json,
    /// One "HH:MM" per line
    Text,
}

/// Request document shared by `available` and `schedule`.
#[derive(Deserialize)]
struct SlotRequest {
    date: String,
    #[serde(default)]
    service: RawService,
    #[serde(default)]
    appointments: Vec<RawAppointment>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Grid { policy, format } => {
            let calculator = AvailabilityCalculator::new(policy.resolve()?)
                .context("Invalid slot policy")?;
            emit(None, &calculator.candidate_grid(), format)?;
        }
        Commands::Available {
            input,
            output,
            policy,
            format,
        } => {
            let calculator = AvailabilityCalculator::new(policy.resolve()?)
                .context("Invalid slot policy")?;
            let (date, request) = read_request(input.as_deref())?;
            let appointments = records::appointments_on(date, &request.appointments);
            let service = request.service.coerce();

            let slots = calculator.available_slots(service.duration_minutes, &appointments);
            info!(%date, slots = slots.len(), "computed availability");
            emit(output.as_deref(), &slots, format)?;
        }
        Commands::Schedule {
            input,
            output,
            config,
            now,
            timezone,
            format,
        } => {
            let salon = read_text(Some(&config))?;
            let schedule = SalonSchedule::from_json(&salon)
                .with_context(|| format!("Invalid salon config: {}", config))?;
            let (date, request) = read_request(input.as_deref())?;
            let now = resolve_now(now.as_deref(), &timezone)?;
            debug!(%now, "resolved current time");

            let appointments = records::coerce_all(&request.appointments);
            let slots =
                schedule.available_times(date, request.service.coerce(), &appointments, now);
            info!(
                %date,
                open = schedule.is_open_on(date),
                slots = slots.len(),
                "computed availability"
            );
            emit(output.as_deref(), &slots, format)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

impl PolicyArgs {
    /// Start from the policy file (or the built-in default) and apply flag overrides.
    fn resolve(&self) -> Result<SlotPolicy> {
        let mut policy = match &self.config {
            Some(path) => {
                let json = read_text(Some(path))?;
                SlotPolicy::from_json(&json)
                    .with_context(|| format!("Invalid policy file: {}", path))?
            }
            None => SlotPolicy::default(),
        };

        if let Some(open) = &self.open {
            policy.hours.open = parse_time_arg("--open", open)?;
        }
        if let Some(close) = &self.close {
            policy.hours.close = parse_time_arg("--close", close)?;
        }
        if let Some(step) = self.step {
            policy.granularity_minutes = step;
        }
        if let Some(minutes) = self.default_duration {
            policy.default_duration_minutes = minutes;
        }
        Ok(policy)
    }
}

fn parse_time_arg(flag: &str, value: &str) -> Result<TimeOfDay> {
    value
        .parse()
        .with_context(|| format!("{} expects HH:MM, got '{}'", flag, value))
}

/// Parse `--now`, or read the system clock in `timezone`.
fn resolve_now(now: Option<&str>, timezone: &str) -> Result<NaiveDateTime> {
    if let Some(raw) = now {
        return NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(|d| d.and_time(TimeOfDay::MIDNIGHT.into()))
            })
            .with_context(|| format!("--now expects YYYY-MM-DDTHH:MM, got '{}'", raw));
    }
    let tz: Tz = timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", timezone, e))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

fn render(slots: &[TimeOfDay], format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => {
            let mut json = serde_json::to_string(slots)?;
            json.push('\n');
            json
        }
        Format::Text => slots.iter().map(|s| format!("{}\n", s)).collect(),
    })
}

/// Load the request document and resolve its target date.
fn read_request(path: Option<&str>) -> Result<(NaiveDate, SlotRequest)> {
    let json = read_text(path)?;
    let request: SlotRequest =
        serde_json::from_str(&json).context("Failed to parse request JSON")?;
    let date = records::parse_date_strict(&request.date)?;
    Ok((date, request))
}

/// Contents of `path`, or all of stdin when no path is given.
fn read_text(path: Option<&str>) -> Result<String> {
    let Some(path) = path else {
        let mut buf = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    };
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
}

/// Render `slots` and write them to `output`, or stdout.
fn emit(output: Option<&str>, slots: &[TimeOfDay], format: Format) -> Result<()> {
    let content = render(slots, format)?;
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path)),
        None => io::stdout()
            .lock()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout"),
    }
}
