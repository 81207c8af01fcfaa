//! Clap derive structures for the `vmdash` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// vmdash -- dashboard and control CLI for VMware vmrest
#[derive(Debug, Parser)]
#[command(
    name = "vmdash",
    version,
    about = "Manage VMware Workstation/Fusion VMs from the command line",
    long_about = "A dashboard CLI for the VMware vmrest daemon.\n\n\
        Lists VMs with live power state and guest IP, drives power\n\
        transitions optimistically, and manages NICs, shared folders,\n\
        virtual networks, and port forwarding.",
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
    /// Daemon profile to use
    #[arg(long, short = 'p', env = "VMDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Daemon URL (overrides profile)
    #[arg(long, short = 'H', env = "VMREST_URL", global = true)]
    pub host: Option<String>,

    /// Basic-auth username (password comes from VMREST_PASSWORD)
    #[arg(long, short = 'u', env = "VMREST_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VMDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VMDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "VMDASH_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and manage virtual machines
    #[command(alias = "vm")]
    Vms(VmsArgs),

    /// Drive power transitions
    #[command(alias = "pw")]
    Power(PowerArgs),

    /// Live dashboard: re-render the VM table every poll cycle
    Watch(WatchArgs),

    /// Manage NIC devices on a VM
    Nic(NicArgs),

    /// Manage shared folders on a VM
    #[command(alias = "sf")]
    Folders(FoldersArgs),

    /// View and create host virtual networks
    #[command(alias = "net")]
    Networks(NetworksArgs),

    /// Manage port-forward rules on a NAT network
    #[command(alias = "pf")]
    Portforward(PortforwardArgs),

    /// Manage vmdash configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── VMs ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VmsArgs {
    #[command(subcommand)]
    pub command: VmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum VmsCommand {
    /// List VMs with power state, IP, and hardware columns
    #[command(alias = "ls")]
    List,

    /// Show one VM in detail
    Get {
        /// VM id or display name
        vm: String,
    },

    /// Delete a VM (cannot be undone)
    #[command(alias = "rm")]
    Delete {
        /// VM id or display name
        vm: String,
    },

    /// Clone a new VM from an existing one
    Clone {
        /// Parent VM id or display name
        parent: String,
        /// Name for the new VM
        #[arg(long)]
        name: String,
    },

    /// Register an existing VM by name and .vmx path
    Register {
        /// Display name
        name: String,
        /// Filesystem path to the .vmx file
        path: String,
    },

    /// Update CPU/memory settings
    Update {
        /// VM id or display name
        vm: String,
        /// Number of virtual CPUs
        #[arg(long)]
        processors: Option<u32>,
        /// Memory size in MB
        #[arg(long)]
        memory: Option<u64>,
    },

    /// Show restriction flags
    Restrictions {
        /// VM id or display name
        vm: String,
    },
}

// ── Power ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PowerArgs {
    #[command(subcommand)]
    pub command: PowerCommand,
}

#[derive(Debug, Subcommand)]
pub enum PowerCommand {
    /// Show the current power state
    Get { vm: String },
    /// Power on
    On { vm: String },
    /// Hard power off
    Off { vm: String },
    /// Graceful guest shutdown
    Shutdown { vm: String },
    /// Suspend to disk
    Suspend { vm: String },
    /// Pause execution
    Pause { vm: String },
    /// Resume a paused VM
    Unpause { vm: String },
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (defaults to the engine's 5s cadence)
    #[arg(long)]
    pub interval: Option<u64>,
}

// ── NICs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NicArgs {
    #[command(subcommand)]
    pub command: NicCommand,
}

#[derive(Debug, Subcommand)]
pub enum NicCommand {
    /// List NICs on a VM
    #[command(alias = "ls")]
    List { vm: String },

    /// Attach a new NIC
    Add {
        vm: String,
        /// NIC type: bridged, nat, hostonly, custom
        #[arg(long = "type")]
        nic_type: String,
        /// Virtual network to attach to (e.g. vmnet8)
        #[arg(long, default_value = "")]
        vmnet: String,
    },

    /// Reconfigure a NIC
    Update {
        vm: String,
        /// NIC index
        index: u32,
        #[arg(long = "type")]
        nic_type: String,
        #[arg(long, default_value = "")]
        vmnet: String,
    },

    /// Detach a NIC
    #[command(alias = "rm")]
    Delete {
        vm: String,
        /// NIC index
        index: u32,
    },
}

// ── Shared folders ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FoldersArgs {
    #[command(subcommand)]
    pub command: FoldersCommand,
}

#[derive(Debug, Subcommand)]
pub enum FoldersCommand {
    /// List shared folders on a VM
    #[command(alias = "ls")]
    List { vm: String },

    /// Mount a host directory into the guest
    Add {
        vm: String,
        /// Folder id (mount name in the guest)
        folder_id: String,
        /// Host directory path
        host_path: String,
        /// Access flags (4 = read/write, 0 = read-only)
        #[arg(long, default_value = "4")]
        flags: i32,
    },

    /// Update a shared folder mapping
    Update {
        vm: String,
        folder_id: String,
        host_path: String,
        #[arg(long, default_value = "4")]
        flags: i32,
    },

    /// Remove a shared folder
    #[command(alias = "rm")]
    Delete { vm: String, folder_id: String },
}

// ── Networks ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworksCommand {
    /// List host virtual networks
    #[command(alias = "ls")]
    List,

    /// Create a virtual network
    Create {
        /// Network name (e.g. vmnet9)
        name: String,
        /// Network type: bridged, nat, hostOnly
        #[arg(long = "type")]
        net_type: String,
    },
}

// ── Port forwarding ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortforwardArgs {
    #[command(subcommand)]
    pub command: PortforwardCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortforwardCommand {
    /// List port-forward rules on a network
    #[command(alias = "ls")]
    List { vmnet: String },

    /// Create or update the rule at (network, protocol, port)
    Set {
        vmnet: String,
        /// tcp or udp
        protocol: String,
        /// Host port
        port: u16,
        /// Guest IP to forward to
        #[arg(long)]
        guest_ip: String,
        /// Guest port to forward to
        #[arg(long)]
        guest_port: u16,
        /// Description
        #[arg(long)]
        desc: Option<String>,
    },

    /// Delete the rule at (network, protocol, port)
    #[command(alias = "rm")]
    Delete {
        vmnet: String,
        protocol: String,
        port: u16,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile
    Init {
        /// Daemon URL
        #[arg(long, default_value = "http://127.0.0.1:8697")]
        host: String,
        /// Basic-auth username
        #[arg(long)]
        username: Option<String>,
        /// Profile name
        #[arg(long, default_value = "default")]
        profile: String,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
