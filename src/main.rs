//! USB serial port mapper - CLI entry point.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use usbports::config::{Config, example_config, generate_config};
use usbports::{CandidateSource, PortIndex, PortPath, PortScanner, Resolution, Resolve};
use usbports::{TopologyResolver, Udevadm};

#[derive(Parser)]
#[command(name = "usbports")]
#[command(about = "Map USB serial devices to physical ports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: auto-detect)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List serial devices by physical port (default)
    List,

    /// Print the device file on a port
    Lookup {
        /// Port path (e.g., "1.3") or configured label
        port: String,
    },

    /// Show every candidate device node and how it resolved
    Scan,

    /// Print blank example config file
    InitConfig,

    /// Generate config from current system
    GenerateConfig {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions early (doesn't need config or devices)
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "usbports", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::InitConfig) => {
            print!("{}", example_config());
        }
        Some(Commands::Scan) => {
            print_scan(&config);
        }
        Some(Commands::Lookup { port }) => {
            let index = PortIndex::from_config(&config);
            let path = match config.port_for_label(&port) {
                Some(path) => path,
                None => port.parse::<PortPath>()?,
            };
            match index.lookup(&path) {
                Some(device) => println!("{}", device),
                None => {
                    eprintln!("No serial device on port {}", path);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::GenerateConfig { output }) => {
            let index = PortIndex::from_config(&config);
            let content = generate_config(&index);
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)?;
                    eprintln!("Config written to {}", path.display());
                    eprintln!("Edit the labels, then copy to one of:");
                    eprintln!("  ./usbports.toml");
                    eprintln!("  ~/.config/usbports/config.toml");
                    eprintln!("  /etc/usbports.toml");
                }
                None => print!("{}", content),
            }
        }
        Some(Commands::Completions { .. }) => {
            // Handled above before loading config
            unreachable!()
        }
        Some(Commands::List) | None => {
            let index = PortIndex::from_config(&config);
            print_ports(&index, &config);
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("usbports={}", level).into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_ports(index: &PortIndex, config: &Config) {
    if index.is_empty() {
        println!("No USB serial devices mapped to ports");
        if !index.available_ports().is_empty() {
            println!(
                "({} device node(s) found but none resolved; try `usbports scan`)",
                index.available_ports().len()
            );
        }
        return;
    }

    println!("{:<10} {:<16} LABEL", "PORT", "DEVICE");
    for (port, device) in index.ports() {
        let label = config.port_label(port).unwrap_or("");
        let note = if port.is_normalized() { "" } else { "  (behind hub)" };
        println!("{:<10} {:<16} {}{}", port.as_str(), device.to_string(), label, note);
    }
}

fn print_scan(config: &Config) {
    let scanner = PortScanner::with_config(config.scanner_config());
    let resolver = TopologyResolver::with_query(Udevadm::with_tool(&config.udev.tool));

    let candidates = scanner.list_candidates();
    if candidates.is_empty() {
        println!(
            "No device nodes found under {} (indices 0-{})",
            scanner.config().prefixes.join(", "),
            scanner.config().max_index.saturating_sub(1)
        );
        return;
    }

    for device in &candidates {
        match resolver.resolve(device) {
            Resolution::Resolved(port) => println!("{:<16} port {}", device.to_string(), port),
            Resolution::Unresolvable(reason) => {
                println!("{:<16} unresolved: {}", device.to_string(), reason)
            }
        }
    }
}
