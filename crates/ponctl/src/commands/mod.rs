//! Command dispatch: bridges CLI args -> core workflows -> output
//! formatting.

pub mod config_cmd;
pub mod onu;
pub mod profile;
pub mod vlan;

use ponctl_core::OltSession;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &mut OltSession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Onu(args) => onu::handle(session, args, global).await,
        Command::Profile(args) => profile::handle(session, args, global).await,
        // Vlan, Config, and Completions are handled before dispatch
        Command::Vlan(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
