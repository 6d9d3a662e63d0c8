//! ONU registration command handlers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use owo_colors::OwoColorize;
use tabled::Tabled;

use ponctl_core::{
    BlacklistEntry, OltPort, OltSession, OnuInfoEntry, OnuRegistration, SerialNumber, allowlist,
};

use crate::cli::{GlobalOpts, OnuArgs, OnuCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OnuRow {
    #[tabled(rename = "Serial Number")]
    serial: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Service Profiles")]
    services: String,
}

impl From<&OnuRegistration> for OnuRow {
    fn from(reg: &OnuRegistration) -> Self {
        Self {
            serial: reg.serial.to_string(),
            interface: reg
                .interface
                .map_or_else(|| "-".into(), |intf| intf.to_string()),
            services: reg.services.join(", "),
        }
    }
}

#[derive(Tabled)]
struct BlacklistRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Serial Number")]
    serial: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Cause")]
    cause: String,
}

impl From<&BlacklistEntry> for BlacklistRow {
    fn from(entry: &BlacklistEntry) -> Self {
        Self {
            interface: entry.if_name.clone(),
            serial: entry.serial_number.clone(),
            password: entry.password.clone(),
            cause: entry.cause_label().to_owned(),
        }
    }
}

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Serial Number")]
    serial: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Rx Power")]
    rx_power: i32,
    #[tabled(rename = "Tx Power")]
    tx_power: i32,
}

impl From<&OnuInfoEntry> for InfoRow {
    fn from(entry: &OnuInfoEntry) -> Self {
        Self {
            interface: entry.if_name.clone(),
            serial: entry.serial_number.clone(),
            state: if entry.is_up() { "up" } else { "down" }.to_owned(),
            rx_power: entry.rx_power,
            tx_power: entry.tx_power,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    session: &mut OltSession,
    args: OnuArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OnuCommand::Sync => {
            let report = session.sync().await?;
            if !global.quiet {
                eprintln!(
                    "Reconciled: {} discovered, {} updated, {} pruned",
                    report.discovered, report.updated, report.pruned
                );
            }
            print_registry(session, global);
            Ok(())
        }

        OnuCommand::List => {
            session.sync().await?;
            print_registry(session, global);
            Ok(())
        }

        OnuCommand::Authorize {
            serial,
            port,
            allow,
        } => {
            let serial = SerialNumber::parse(&serial)?;
            let port = port.as_deref().map(OltPort::parse).transpose()?;
            session.sync().await?;
            if allow && !session.registry().contains(&serial) {
                session.allow(serial.clone())?;
            }
            let interface = session.authorize(&serial, port).await?;
            if !global.quiet {
                eprintln!("Authorized {serial} on {interface}");
            }
            Ok(())
        }

        OnuCommand::Deauthorize { serial } => {
            let serial = SerialNumber::parse(&serial)?;
            confirm(global, &format!("Deauthorize {serial}?"))?;
            session.sync().await?;
            session.deauthorize(&serial).await?;
            if !global.quiet {
                eprintln!("Deauthorized {serial}");
            }
            Ok(())
        }

        OnuCommand::AuthFile { path } => auth_file(session, &path, global).await,

        OnuCommand::DeauthFile { path } => {
            let serials = allowlist::parse_deny_list(open(&path)?)?;
            confirm(
                global,
                &format!("Deauthorize {} serial numbers?", serials.len()),
            )?;
            session.sync().await?;
            let success = session.deauthorize_many(&serials).await;
            if !global.quiet {
                eprintln!("{success}/{} ONUs deauthorized", serials.len());
            }
            Ok(())
        }

        OnuCommand::Blacklist => {
            let entries = session.blacklist().await?;
            let out = output::render_list(
                &global.output,
                &entries,
                |e| BlacklistRow::from(e),
                |e| e.serial_number.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OnuCommand::Info => {
            let entries = session.onu_info().await?;
            let out = output::render_list(&global.output, &entries, |e| InfoRow::from(e), |e| {
                e.serial_number.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OnuCommand::AddService { serial, profiles } => {
            let serial = SerialNumber::parse(&serial)?;
            session.sync().await?;
            session.add_services(&serial, &profiles).await?;
            if !global.quiet {
                eprintln!("Bound {} service profile(s) to {serial}", profiles.len());
            }
            Ok(())
        }

        OnuCommand::RemoveService { interface, profile } => {
            let interface = interface.parse()?;
            session.remove_service(interface, &profile).await?;
            if !global.quiet {
                eprintln!("Unbound {profile} from {interface}");
            }
            Ok(())
        }
    }
}

fn print_registry(session: &OltSession, global: &GlobalOpts) {
    let snapshot = session.registry().snapshot();
    let out = output::render_list(&global.output, &snapshot, |reg| OnuRow::from(reg), |reg| {
        reg.serial.to_string()
    });
    output::print_output(&out, global.quiet);
}

/// Load an allow-list, reconcile, then walk the blacklist and authorize
/// every waiting ONU whose serial is on the list. Per-ONU failures are
/// reported and skipped.
async fn auth_file(
    session: &mut OltSession,
    path: &Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Reconcile before loading: a sync pass prunes pending entries, so
    // the allow-list goes in only once the device view is fresh.
    session.sync().await?;
    let loaded = session.load_allow_list(open(path)?)?;
    if !global.quiet {
        eprintln!("Loaded {loaded} allow-list entries");
    }

    let waiting = session.blacklist().await?;
    let color = output::should_color();
    let mut authorized = 0usize;
    let mut seen = 0usize;

    for entry in &waiting {
        let Ok(serial) = SerialNumber::parse(&entry.serial_number) else {
            continue;
        };
        if !session.registry().contains(&serial) {
            continue;
        }
        seen += 1;
        let port = match OltPort::parse(&entry.if_name) {
            Ok(port) => port,
            Err(err) => {
                report_item(color, false, &format!("{serial}: {err}"));
                continue;
            }
        };
        match session.authorize(&serial, Some(port)).await {
            Ok(interface) => {
                authorized += 1;
                report_item(color, true, &format!("{serial} -> {interface}"));
            }
            Err(err) => report_item(color, false, &format!("{serial}: {err}")),
        }
    }

    if !global.quiet {
        eprintln!("{authorized}/{seen} waiting ONUs authorized");
    }
    Ok(())
}

fn report_item(color: bool, ok: bool, message: &str) {
    if color {
        if ok {
            eprintln!("  {} {message}", "✓".green());
        } else {
            eprintln!("  {} {message}", "✗".red());
        }
    } else {
        eprintln!("  {} {message}", if ok { "ok" } else { "failed" });
    }
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Destructive operations ask first unless `--yes` or a non-interactive
/// stdin.
fn confirm(global: &GlobalOpts, prompt: &str) -> Result<(), CliError> {
    if global.yes {
        return Ok(());
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::Validation {
            reason: "refusing a destructive operation without --yes in a non-interactive run"
                .to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Validation {
            reason: format!("confirmation failed: {e}"),
        })?;
    if confirmed {
        Ok(())
    } else {
        Err(CliError::Validation {
            reason: "aborted by user".to_owned(),
        })
    }
}
