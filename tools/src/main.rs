use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ssync_tools::{
    collect_packet_entries, format_report_pretty, inspect_packet, layout_report, Side,
};
use tracing::warn;
use wire::MessageFactory;

#[derive(Parser)]
#[command(
    name = "ssync-tools",
    version,
    about = "ssync packet inspection and catalog tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode captured packets, one message per file.
    Inspect {
        /// Packet file, or a directory of packet files.
        packet_path: PathBuf,
        /// Which peer sent the packets.
        #[arg(long, value_enum, default_value_t = SideArg::Client)]
        side: SideArg,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Print the catalog layouts and fingerprint as JSON.
    Layout,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SideArg {
    Client,
    Server,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Client => Self::Client,
            SideArg::Server => Self::Server,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ssync_tools=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            packet_path,
            side,
            glob,
            format,
        } => {
            let factory = Side::from(side).factory()?;
            if packet_path.is_dir() {
                let entries = collect_packet_entries(&packet_path, glob.as_deref())?;
                for entry in entries {
                    if format == OutputFormat::Pretty {
                        println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    }
                    if let Err(err) = inspect_file(&entry.path, &factory, format) {
                        warn!(path = %entry.path.display(), "{err:#}");
                    }
                }
            } else {
                inspect_file(&packet_path, &factory, format)?;
            }
        }
        Command::Layout => {
            let report = layout_report()?;
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn inspect_file(path: &Path, factory: &MessageFactory, format: OutputFormat) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read packet {}", path.display()))?;
    let report = inspect_packet(&bytes, factory)?;
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(&report).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => println!("{}", format_report_pretty(&report)),
    }
    Ok(())
}
