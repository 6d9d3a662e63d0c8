//! Clap derive structures for the `ponctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ponctl -- provision subscriber ONUs on Iskratel Lumia GPON OLTs
#[derive(Debug, Parser)]
#[command(
    name = "ponctl",
    version,
    about = "Manage ONU provisioning on Iskratel Lumia GPON OLTs",
    long_about = "Tracks authorized ONU serial numbers, assigns subinterfaces, and keeps\n\
        the local registry reconciled with the OLT's RESTCONF tables.",
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
    /// OLT profile from the config file
    #[arg(long, short = 'p', env = "PONCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// OLT address (overrides profile)
    #[arg(long, short = 'H', env = "PONCTL_HOST", global = true)]
    pub host: Option<String>,

    /// Session cookie value
    #[arg(long, env = "PONCTL_COOKIE", global = true, hide_env = true)]
    pub cookie: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PONCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Verify the device TLS certificate (off by default: devices ship
    /// self-signed certs)
    #[arg(long, env = "PONCTL_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PONCTL_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage ONU registrations
    #[command(alias = "o")]
    Onu(OnuArgs),

    /// Inspect and manage device profiles
    #[command(alias = "prof")]
    Profile(ProfileArgs),

    /// Encode / decode VLAN membership bitmaps
    Vlan(VlanArgs),

    /// Manage ponctl configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── onu ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OnuArgs {
    #[command(subcommand)]
    pub command: OnuCommand,
}

#[derive(Debug, Subcommand)]
pub enum OnuCommand {
    /// Reconcile the registry with the device and report the changes
    Sync,

    /// List registered ONUs (reconciles first)
    List,

    /// Authorize one serial number
    Authorize {
        /// ONU serial number (12 chars, or 8 with the vendor code implied)
        serial: String,

        /// PON port ("shelf/slot") to allocate a subinterface under
        #[arg(long)]
        port: Option<String>,

        /// Add the serial to the local allow-list first
        #[arg(long)]
        allow: bool,
    },

    /// Deauthorize one serial number (blanks its interface on the device)
    Deauthorize {
        /// ONU serial number
        serial: String,
    },

    /// Load an allow-list file, reconcile, and authorize every
    /// blacklisted ONU that is on the list
    AuthFile {
        /// Path to the allow-list (serial [service-profile ...] per line)
        path: PathBuf,
    },

    /// Deauthorize every serial in a deny-list file
    DeauthFile {
        /// Path to the deny-list (serial per line)
        path: PathBuf,
    },

    /// Show ONUs waiting to be authorized
    Blacklist,

    /// Show operational ONU state
    Info,

    /// Bind service profiles to an authorized ONU
    AddService {
        /// ONU serial number
        serial: String,

        /// Service profile names, applied in order
        #[arg(required = true)]
        profiles: Vec<String>,
    },

    /// Unbind one service profile from an ONU interface
    RemoveService {
        /// ONU interface ("shelf/slot/port")
        interface: String,

        /// Service profile name
        profile: String,
    },
}

// ── profile ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub kind: ProfileKind,
}

#[derive(Debug, Subcommand)]
pub enum ProfileKind {
    /// Service profiles (the bundles bound to ONU interfaces)
    Service {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// VLAN profiles
    Vlan {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// List all profiles of this kind
    List,

    /// Show one profile by name
    Get { name: String },

    /// Delete one profile by name (refused while in use)
    Delete { name: String },
}

// ── vlan ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// Encode VLAN ids into the wire bitmap
    Encode {
        /// VLAN ids (space or comma separated, 1-4095)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Decode a wire bitmap into VLAN ids
    Decode {
        /// Base64 bitmap string
        bitmap: String,
    },
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter config file with one profile
    Init {
        /// OLT address
        #[arg(long)]
        host: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Print the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
