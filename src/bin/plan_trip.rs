use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use trip_planner::Result;
use trip_planner::airports::{FixedAirportTable, default_directory};
use trip_planner::api::{PlanResponse, TripRequest, plan_trip};
use trip_planner::config::AirportDatasetConfig;
use trip_planner::traits::AirportDirectory;

/// Plan a group trip from a JSON request.
#[derive(Debug, Parser)]
#[command(name = "plan-trip", version)]
struct Args {
    /// Request JSON file; reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the response JSON; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use only the built-in airport table.
    #[arg(long)]
    offline: bool,

    /// Airport dataset URL (OurAirports CSV format).
    #[arg(long)]
    airports_url: Option<String>,

    /// Airport dataset request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    airports_timeout: u64,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_request(path: Option<&PathBuf>) -> Result<TripRequest> {
    let request = match path {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            serde_json::from_str(&body)?
        }
    };
    Ok(request)
}

fn write_response(path: Option<&PathBuf>, response: &PlanResponse) -> Result<()> {
    let writer: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn directory(args: &Args) -> Result<Box<dyn AirportDirectory>> {
    if args.offline {
        return Ok(Box::new(FixedAirportTable::default()));
    }
    let mut config = AirportDatasetConfig::default();
    if let Some(url) = &args.airports_url {
        config.url = url.clone();
    }
    config.timeout_secs = args.airports_timeout;
    Ok(Box::new(default_directory(config)?))
}

fn run(args: &Args) -> Result<bool> {
    let request = read_request(args.input.as_ref())?;
    let response = plan_trip(&request, directory(args)?);
    write_response(args.output.as_ref(), &response)?;
    Ok(response.success)
}

fn main() -> ExitCode {
    enable_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "plan-trip failed");
            ExitCode::FAILURE
        }
    }
}
