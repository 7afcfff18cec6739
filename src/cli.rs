//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use wave_control::{config::ConfigOverrides, pipeline::Key};

/// Hand-gesture slide control: 1 finger next, 2 previous, 3 first, 4 last
#[derive(Parser, Debug)]
#[command(name = "wave-control")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read landmark frames and turn stable gestures into key presses
    Run(RunArgs),

    /// List capture devices an external detector can use
    ListCameras,

    /// Show the gesture to action table
    Gestures,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show(TuningArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Newline-delimited JSON landmark frames, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// How key presses are delivered
    #[arg(long, value_enum, default_value_t = InjectorKind::Line)]
    pub injector: InjectorKind,

    /// Program and leading args for `--injector command`; the key name is appended
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM")]
    pub command: Vec<String>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InjectorKind {
    /// Print one key name per line on stdout
    Line,
    /// Run an external program per key press
    Command,
}

#[derive(clap::Args, Debug, Default)]
pub struct TuningArgs {
    /// Frames in the stability window
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Fraction of the window a gesture must hold (0, 1]
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Fingertip clearance past the pip joint, normalized units
    #[arg(long)]
    pub margin: Option<f32>,

    /// Seconds after start before any key is pressed
    #[arg(long)]
    pub calibration_secs: Option<f32>,

    /// Delay between frames in milliseconds (0 = none)
    #[arg(long)]
    pub frame_interval_ms: Option<u64>,

    /// Key for the 1-finger gesture
    #[arg(long, value_enum)]
    pub next_key: Option<Key>,

    /// Key for the 2-finger gesture
    #[arg(long, value_enum)]
    pub prev_key: Option<Key>,

    /// Key for the 3-finger gesture
    #[arg(long, value_enum)]
    pub home_key: Option<Key>,

    /// Key for the 4-finger gesture
    #[arg(long, value_enum)]
    pub end_key: Option<Key>,
}

impl TuningArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            window_size: self.window_size,
            consistency_threshold: self.threshold,
            finger_margin: self.margin,
            calibration_secs: self.calibration_secs,
            frame_interval_ms: self.frame_interval_ms,
            next_key: self.next_key,
            prev_key: self.prev_key,
            home_key: self.home_key,
            end_key: self.end_key,
        }
    }
}
