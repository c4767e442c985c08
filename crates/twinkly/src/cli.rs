//! Clap derive structures for the `twinkly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use twinkly_core::EntityKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// twinkly -- control Twinkly LED lights on your local network
#[derive(Debug, Parser)]
#[command(
    name = "twinkly",
    version,
    about = "Control and monitor Twinkly LED devices",
    long_about = "Talks to Twinkly controllers over their local HTTP API.\n\n\
        Targets the device given with --host, or every device in the config file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device address, `host` or `host:port` (overrides the config file)
    #[arg(long, short = 'H', env = "TWINKLY_HOST", global = true)]
    pub host: Option<String>,

    /// Display name for the device given with --host
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// How the device given with --host is exposed
    #[arg(long, value_enum, global = true)]
    pub kind: Option<KindArg>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TWINKLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "TWINKLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Power and brightness
    Light,
    /// Power only
    Switch,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Light => Self::Light,
            KindArg::Switch => Self::Switch,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll devices and show power, brightness and availability
    #[command(alias = "st")]
    Status,

    /// Show device identity (uuid, MAC, model, firmware)
    Info,

    /// Turn the LEDs on
    On(OnArgs),

    /// Turn the LEDs off
    Off,

    /// Set brightness on the 0-255 scale
    #[command(alias = "br")]
    Brightness(BrightnessArgs),

    /// Poll devices continuously and print changes until Ctrl-C
    Watch(WatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OnArgs {
    /// Brightness to set first (0-255); ignored for switches
    #[arg(long, short = 'b')]
    pub brightness: Option<u8>,
}

#[derive(Debug, Args)]
pub struct BrightnessArgs {
    /// Brightness level (0-255)
    pub level: u8,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the effective configuration
    Show,

    /// Write a config file for the device given with --host
    Init,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
