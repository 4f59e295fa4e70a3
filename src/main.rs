use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mullvad_waybar::client::{MullvadCli, VpnClient};
use mullvad_waybar::config::Config;
use mullvad_waybar::cycle::{self, Direction};
use mullvad_waybar::{connect, locations, notify, status, waybar};

#[derive(Parser)]
#[command(name = "mullvad-waybar")]
#[command(about = "Mullvad VPN status and location switching widgets for Waybar")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the status widget record
    Status,
    /// Emit the compact lock-icon record
    Minimal,
    /// Emit the record for one location button
    Button {
        /// Location code (e.g. AUS)
        code: String,
    },
    /// Switch to a specific location
    Connect {
        /// Location code (e.g. AUS)
        code: String,
    },
    /// Cycle to another location, or disconnect
    ///
    /// ACTION is next, prev, disconnect, or a location code.
    /// Defaults to next.
    Cycle { action: Option<String> },
    /// Generate a default config file
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for Waybar JSON.
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_or_default();
    let client = MullvadCli::new(&config);

    let exit = match cli.command {
        Commands::Status => {
            let state = status::query(&client).await;
            emit(&waybar::status_module(&state))?;
            0
        }
        Commands::Minimal => {
            let state = status::query(&client).await;
            emit(&waybar::minimal_module(&state))?;
            0
        }
        Commands::Button { code } => match locations::lookup(&code) {
            Some(entry) => {
                let state = status::query(&client).await;
                emit(&waybar::button_module(entry, &state))?;
                0
            }
            None => {
                emit(&waybar::button_error())?;
                1
            }
        },
        Commands::Connect { code } => cmd_connect(&client, &config, &code).await,
        Commands::Cycle { action } => cmd_cycle(&client, &config, action).await,
        Commands::Init => cmd_init(),
    };

    std::process::exit(exit);
}

fn emit(module: &waybar::Module) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(module)?);
    Ok(())
}

/// Run the orchestration and report the outcome on stdout.
async fn cmd_connect(client: &MullvadCli, config: &Config, code: &str) -> i32 {
    match connect::connect_to(client, code, config.settle()).await {
        Ok(entry) => {
            if config.notifications {
                notify::connection_established(entry);
            }
            println!("Connected to {}", entry.name);
            0
        }
        Err(connect::ConnectError::UnknownLocation(code)) => {
            eprintln!("Unknown location code: {code}");
            eprintln!(
                "Available locations: {}",
                locations::codes().collect::<Vec<_>>().join(", ")
            );
            1
        }
        Err(error) => {
            eprintln!("{error}");
            1
        }
    }
}

async fn cmd_cycle(client: &MullvadCli, config: &Config, action: Option<String>) -> i32 {
    let action = action.unwrap_or_else(|| "next".to_string());

    match action.to_lowercase().as_str() {
        "next" | "prev" => {
            let direction = if action.eq_ignore_ascii_case("next") {
                Direction::Next
            } else {
                Direction::Prev
            };
            let state = status::query(client).await;
            let target = cycle::advance(state.code(), direction);
            info!("Cycling from {:?} to {}", state.code(), target);
            cmd_connect(client, config, target).await
        }
        "disconnect" => match client.disconnect().await {
            Ok(()) => {
                println!("VPN disconnected");
                0
            }
            Err(error) => {
                eprintln!("Failed to disconnect: {error}");
                1
            }
        },
        code if locations::lookup(code).is_some() => cmd_connect(client, config, code).await,
        _ => {
            eprintln!(
                "Usage: mullvad-waybar cycle [next|prev|disconnect|{}]",
                cycle::CYCLE_ORDER.join("|")
            );
            1
        }
    }
}

fn cmd_init() -> i32 {
    let Some(path) = Config::default_path() else {
        eprintln!("Could not determine the config directory");
        return 1;
    };

    let write = || -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Config::default().save(&path)?;
        Ok(())
    };

    match write() {
        Ok(()) => {
            println!("Created default config: {}", path.display());
            0
        }
        Err(error) => {
            eprintln!("Failed to write config: {error}");
            1
        }
    }
}
