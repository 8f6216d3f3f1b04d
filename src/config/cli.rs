use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::display::Filter;
use crate::orientation::Orientation;

#[derive(Parser)]
#[command(name = "vnc-pad")]
#[command(about = "Remote desktop viewer for keyboard handhelds")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Remote endpoint (host:port)
    pub address: Option<String>,

    /// Session password
    #[arg(long, env = "VNCPAD_PASSWORD")]
    pub password: Option<String>,

    /// Keyboard input device path
    #[arg(long)]
    pub key_device: Option<String>,

    /// Touch input device path
    #[arg(long)]
    pub touch_device: Option<String>,

    /// Do not grab the input devices exclusively
    #[arg(long)]
    pub no_grab: bool,

    /// Touch panel orientation (portrait, landscape-right, landscape-left, inverted)
    #[arg(long, value_parser = clap::value_parser!(Orientation))]
    pub orientation: Option<Orientation>,

    /// Never release the pointer after sync markers without a lift
    #[arg(long)]
    pub no_release_debounce: bool,

    /// Texture filter (pixel, blur)
    #[arg(long, value_parser = clap::value_parser!(Filter))]
    pub filter: Option<Filter>,

    /// Server message wait timeout in milliseconds
    #[arg(long)]
    pub wait_timeout_ms: Option<u64>,

    /// Path to config file
    #[arg(long, env = "VNCPAD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dump raw input events for debugging
    Dump {
        /// Device to dump: "keys" or "touch"
        device: String,
    },
}
