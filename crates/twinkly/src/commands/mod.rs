//! Command dispatch: resolves target devices, runs the command, renders output.

pub mod config_cmd;
pub mod info;
pub mod power;
pub mod status;
pub mod util;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_for(global)?;
    let targets = config::resolve_targets(global, &cfg)?;

    match cmd {
        Command::Status => status::handle(targets, global).await,
        Command::Info => info::handle(targets, global).await,
        Command::On(args) => power::handle(targets, power::Action::On(args.brightness), global).await,
        Command::Off => power::handle(targets, power::Action::Off, global).await,
        Command::Brightness(args) => {
            power::handle(targets, power::Action::Brightness(args.level), global).await
        }
        Command::Watch(args) => watch::handle(targets, args, &cfg, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
