// # -----------------------------
// # crates/cli/src/main.rs
// # jvpy host entry point: loads version metadata once, then prints it
// # -----------------------------

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jvpy_version_info::VersionInfo;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jvpy",
    about = "jvpy - Python on the JVM",
    disable_version_flag = true
)]
struct Cli {
    /// Print version and build information, then exit
    #[arg(short = 'V', long)]
    version: bool,

    /// Emit version information as JSON (with --version)
    #[arg(long, requires = "version")]
    json: bool,

    /// Path to version.properties (overrides JVPY_VERSION_PROPERTIES)
    #[arg(long, value_name = "PATH")]
    metadata: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let info = match cli.metadata.as_deref() {
        Some(path) => jvpy_version_info::initialize_from(path),
        None => jvpy_version_info::initialize(),
    }
    .context("version information is unavailable")?;
    debug!("version metadata initialized");

    if cli.version {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&version_json(info))?);
        } else {
            println!("{}", info.full_version_string());
        }
        return Ok(());
    }

    println!("jvpy {}", info.full_version_string());
    info!("jvpy {} started on {}", info.version(), info.host_descriptor());
    Ok(())
}

fn version_json(info: &VersionInfo) -> serde_json::Value {
    serde_json::json!({
        "fields": info,
        "version_info": info.version_info().to_string(),
        "release_level": info.release_level_kind().map(|level| level.as_str()),
        "hex_version": format!("{:#010x}", info.hex_version()),
        "scm_identifier": info.scm_identifier(),
        "build_descriptor": info.build_descriptor(),
        "host_descriptor": info.host_descriptor(),
        "full_version": info.full_version_string(),
    })
}
