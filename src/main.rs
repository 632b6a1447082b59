use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rc_teleop::config::Config;
use rc_teleop::error::TeleopError;

/// Drive an RC car over serial with the arrow keys (q or x to stop)
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port of the car's microcontroller
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Control loop rate in ticks per second
    #[arg(long)]
    poll_hz: Option<u32>,

    /// How long a key counts as held without auto-repeat, on terminals that
    /// don't report key releases
    #[arg(long)]
    key_hold_ms: Option<u64>,

    /// Print the available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<Config, TeleopError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::default(),
        };

        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud = baud;
        }
        if let Some(poll_hz) = self.poll_hz {
            config.poll_hz = poll_hz;
        }
        if let Some(key_hold_ms) = self.key_hold_ms {
            config.key_hold_ms = key_hold_ms;
        }
        Ok(config)
    }
}

async fn run(args: Args) -> Result<(), TeleopError> {
    if args.list_ports {
        for port in rc_teleop::serial::list_ports()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let config = args.resolve_config()?;
    rc_teleop::runtime::run(&config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Setup logging (set RUST_LOG=info or debug); stderr keeps the status line on stdout clean
    let directive = if args.verbose { "rc_teleop=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse().unwrap()))
        .init();

    if let Err(e) = run(args).await {
        error!("{}", e);
        eprintln!("Teleop error: {}", e);
        std::process::exit(1);
    }
}
