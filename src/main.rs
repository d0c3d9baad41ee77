use std::fs;
use std::io::{self, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::error;
use whatif::api::{self, ApiError, SimulatePayload};
use whatif::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "whatif",
    about = "Compare career, investment, and purchase scenarios against a do-nothing baseline"
)]
struct Cli {
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one scenario and print the JSON response
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[arg(
        long,
        help = "JSON payload file, or - for stdin; when set, scenario flags are ignored"
    )]
    input: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
    #[command(flatten)]
    payload: SimulatePayload,
}

fn read_payload(path: &Path) -> Result<SimulatePayload, ApiError> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn run_simulate(args: SimulateArgs) -> Result<(), ApiError> {
    let payload = match &args.input {
        Some(path) => read_payload(path)?,
        None => args.payload,
    };
    let response = api::simulate(payload)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = api::run_http_server(SocketAddr::new(host, port)).await {
                error!("server error: {e}");
                return ExitCode::FAILURE;
            }
        }
        Command::Simulate(args) => {
            if let Err(e) = run_simulate(args) {
                error!("simulation failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
