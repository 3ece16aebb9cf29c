//! Command line interface definition

use clap::Parser;
use ferry_types::Platform;
use std::path::PathBuf;

/// ferry - build, archive, upload and announce an application bundle
#[derive(Parser)]
#[command(name = "ferry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, archive, upload and announce an application bundle")]
#[command(long_about = None)]
pub struct Cli {
    /// Build settings file (missing or malformed files fall back to defaults)
    #[arg(long, value_name = "PATH", default_value = ferry_config::settings::SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build workspace; removed when the run ends [default: manifest directory]
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Override the target platform (windows, linux, macos)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging to the temp log directory
    #[arg(long)]
    pub debug: bool,
}
