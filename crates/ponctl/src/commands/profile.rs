//! Profile command handlers.
//!
//! One generic runner covers every profile kind; the kind subcommand
//! only picks the wire type.

use serde::Serialize;
use tabled::Tabled;

use ponctl_core::{NamedEntry, OltSession, ServiceProfileEntry, VlanProfileEntry};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand, ProfileKind};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "In Use")]
    in_use: String,
}

pub async fn handle(
    session: &mut OltSession,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.kind {
        ProfileKind::Service { command } => {
            run::<ServiceProfileEntry>(session, command, global).await
        }
        ProfileKind::Vlan { command } => run::<VlanProfileEntry>(session, command, global).await,
    }
}

async fn run<K: NamedEntry + Serialize>(
    session: &OltSession,
    command: ProfileCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        ProfileCommand::List => {
            let profiles: Vec<K> = session.profiles().await?;
            let out = output::render_list(
                &global.output,
                &profiles,
                |p| ProfileRow {
                    name: p.name().to_owned(),
                    in_use: if p.in_use() { "yes" } else { "no" }.to_owned(),
                },
                |p| p.name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Get { name } => {
            let profile: K = session.profile_by_name(&name).await?;
            let out = output::render_single(
                &global.output,
                &profile,
                |p| serde_yaml::to_string(p).unwrap_or_default(),
                |p| p.name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Delete { name } => {
            session.delete_profile::<K>(&name).await?;
            if !global.quiet {
                eprintln!("Deleted {name}");
            }
            Ok(())
        }
    }
}
