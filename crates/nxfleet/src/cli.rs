//! Clap derive structures for the `nxfleet` CLI.
//!
//! Every tool takes `--devices` plus its own subject and behavior flags.
//! This file is also compiled by `build.rs` for man pages, so it may only
//! depend on `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nxfleet -- query NX-OS switch fleets over NXAPI
#[derive(Debug, Parser)]
#[command(
    name = "nxfleet",
    version,
    about = "Query NX-OS switch fleets over NXAPI",
    long_about = "Run one NX-OS show command against many switches at once and print\n\
        normalized, typed results. Each device's lines are printed together,\n\
        in the order the devices were given. Missing data prints as `na` or `-1`.",
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
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "NXFLEET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Login name for devices that don't configure one
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NXFLEET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// NXAPI HTTPS port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Verify switch TLS certificates against the system store
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Neither send nor store session cookies
    #[arg(long, global = true)]
    pub no_cookies: bool,

    /// Cap on devices queried at once (0 = all)
    #[arg(long, global = true)]
    pub max_parallel: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Whitespace-separated columns, device name first
    Table,
    /// One JSON object per device
    Json,
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Devices a tool runs against.
#[derive(Debug, Args)]
pub struct Targets {
    /// Inventory names, comma separated
    #[arg(long, short = 'd', value_delimiter = ',', required = true)]
    pub devices: Vec<String>,
}

#[derive(Debug, Args)]
pub struct VrfOpt {
    /// VRF name
    #[arg(long, default_value = "default")]
    pub vrf: String,
}

/// Mask-length window for route counts.
#[derive(Debug, Args)]
pub struct MaskRange {
    /// Only count prefixes at least this long
    #[arg(long)]
    pub ge: Option<i64>,

    /// Only count prefixes at most this long
    #[arg(long)]
    pub le: Option<i64>,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// ARP adjacency counts
    Arp(ArpArgs),

    /// BGP neighbors, summaries, prefixes and process state
    Bgp(BgpArgs),

    /// BFD sessions
    Bfd(BfdArgs),

    /// Hardware forwarding table (FIB)
    #[command(alias = "forwarding")]
    Fib(FibArgs),

    /// Interface counters, status and transceivers
    #[command(alias = "if")]
    Interface(InterfaceArgs),

    /// Egress queuing counters
    Queuing(QueuingArgs),

    /// ACL TCAM utilization
    Tcam(TcamArgs),

    /// vPC status and consistency
    Vpc(VpcArgs),

    /// Chassis inventory (`show inventory`)
    Inventory(PlainArgs),

    /// Linecards and supervisors (`show module`)
    Module(ModuleArgs),

    /// Beacon LED state
    LocatorLed(LocatorLedArgs),

    /// Software, boot and platform state
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Files on a filesystem (`dir`)
    Dir(DirArgs),

    /// LLDP neighbors
    Lldp(LldpArgs),

    /// MAC address-table counts
    MacCount(MacCountArgs),

    /// One VLAN
    Vlan(VlanArgs),

    /// VRFs
    Vrf(VrfArgs),

    /// VXLAN NVE peers and interface
    Nve(NveArgs),

    /// IPv6 neighbor discovery cache
    #[command(alias = "nd")]
    Ipv6Neighbor(Ipv6NeighborArgs),

    /// Route counts from the RIB
    RouteSummary(RouteSummaryArgs),

    /// Run any show command and print the raw JSON body
    Show(ShowArgs),

    /// Apply configuration statements from a file
    Conf(ConfArgs),

    /// Manage the nxfleet configuration file and stored passwords
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Tools with no subject.
#[derive(Debug, Args)]
pub struct PlainArgs {
    #[command(flatten)]
    pub targets: Targets,
}

// ── ARP ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ArpArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,
}

// ── BGP ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BgpArgs {
    #[command(subcommand)]
    pub command: BgpCommand,
}

#[derive(Debug, Subcommand)]
pub enum BgpCommand {
    /// Per-peer session detail
    Neighbors(BgpNeighborsArgs),

    /// Unicast peer table
    Summary(BgpSummaryArgs),

    /// L2VPN EVPN peer table
    Evpn(BgpEvpnArgs),

    /// Paths for one IPv4 prefix
    Prefix(BgpPrefixArgs),

    /// BGP process and per-VRF state
    Process(BgpProcessArgs),
}

#[derive(Debug, Args)]
pub struct BgpNeighborsArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Read the IPv6 unicast AF
    #[arg(long)]
    pub ipv6: bool,

    /// Only this peer
    #[arg(long)]
    pub neighbor: Option<String>,
}

#[derive(Debug, Args)]
pub struct BgpSummaryArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// Read the IPv6 unicast AF
    #[arg(long)]
    pub ipv6: bool,

    /// Skip peers that sent no prefixes
    #[arg(long)]
    pub nonzero: bool,
}

#[derive(Debug, Args)]
pub struct BgpEvpnArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// Skip peers that sent no prefixes
    #[arg(long)]
    pub nonzero: bool,
}

#[derive(Debug, Args)]
pub struct BgpPrefixArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// IPv4 prefix, e.g. 10.0.0.0/24
    #[arg(long)]
    pub prefix: String,
}

#[derive(Debug, Args)]
pub struct BgpProcessArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this VRF
    #[arg(long)]
    pub vrf: Option<String>,
}

// ── BFD ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BfdArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Read IPv6 sessions
    #[arg(long)]
    pub ipv6: bool,

    /// Only the session to this destination address
    #[arg(long)]
    pub dest: Option<String>,
}

// ── FIB ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FibArgs {
    #[command(subcommand)]
    pub command: FibCommand,
}

#[derive(Debug, Subcommand)]
pub enum FibCommand {
    /// Next hops for one prefix
    Route(FibRouteArgs),

    /// Route counts per mask length
    Summary(FibSummaryArgs),
}

#[derive(Debug, Args)]
pub struct FibRouteArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// Prefix to look up
    #[arg(long)]
    pub prefix: String,

    /// Linecard to read
    #[arg(long, default_value = "1")]
    pub module: String,

    /// IPv6 FIB
    #[arg(long)]
    pub ipv6: bool,
}

#[derive(Debug, Args)]
pub struct FibSummaryArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// Linecard to read
    #[arg(long, default_value = "1")]
    pub module: String,

    /// IPv6 FIB
    #[arg(long)]
    pub ipv6: bool,

    #[command(flatten)]
    pub range: MaskRange,
}

// ── Interfaces ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    #[command(subcommand)]
    pub command: InterfaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterfaceCommand {
    /// State and error counters
    Counters(InterfaceCountersArgs),

    /// One line per port (`show interface status`)
    Status(InterfaceOpt),

    /// Optics inventory
    Transceiver(TransceiverArgs),
}

#[derive(Debug, Args)]
pub struct InterfaceOpt {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this interface
    #[arg(long, short = 'i')]
    pub interface: Option<String>,
}

#[derive(Debug, Args)]
pub struct InterfaceCountersArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this interface
    #[arg(long, short = 'i')]
    pub interface: Option<String>,

    /// Print only counters that are not zero
    #[arg(long)]
    pub nonzero: bool,
}

#[derive(Debug, Args)]
pub struct TransceiverArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this interface
    #[arg(long, short = 'i')]
    pub interface: Option<String>,

    /// Skip empty cages
    #[arg(long)]
    pub present: bool,
}

// ── Queuing ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QueuingArgs {
    #[command(subcommand)]
    pub command: QueuingCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueuingCommand {
    /// Egress counters per QoS group, stat and unit
    Egress(QueuingEgressArgs),

    /// Tabular per-group counters
    Tabular(QueuingTabularArgs),
}

#[derive(Debug, Args)]
pub struct QueuingEgressArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Interface to read
    #[arg(long, short = 'i')]
    pub interface: String,

    /// Add every QoS group together
    #[arg(long)]
    pub summed: bool,

    /// Print only counters that are not zero
    #[arg(long)]
    pub nonzero: bool,
}

#[derive(Debug, Args)]
pub struct QueuingTabularArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Interface to read
    #[arg(long, short = 'i')]
    pub interface: String,
}

// ── TCAM ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TcamArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Module to read
    #[arg(long, default_value = "1")]
    pub module: String,

    /// How to fold instances into one figure per feature
    #[arg(long = "type", value_enum, default_value = "max")]
    pub reduction: TcamReduction,

    /// Only features at or above this percentage
    #[arg(long)]
    pub ge: Option<f64>,

    /// Only features at or below this percentage
    #[arg(long)]
    pub le: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TcamReduction {
    /// Busiest instance
    Max,
    /// Least busy instance
    Min,
    /// One line per instance
    All,
}

// ── vPC ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VpcArgs {
    #[command(subcommand)]
    pub command: VpcCommand,
}

#[derive(Debug, Subcommand)]
pub enum VpcCommand {
    /// Domain, peer-link and per-vPC state
    Status(PlainArgs),

    /// Parameters that differ between the vPC peers
    Consistency(VpcConsistencyArgs),
}

#[derive(Debug, Args)]
pub struct VpcConsistencyArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Parameter set to compare
    #[arg(long = "type", value_enum, default_value = "global")]
    pub kind: ConsistencyType,

    /// Interface for `--type interface`
    #[arg(long, short = 'i')]
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConsistencyType {
    Global,
    Vni,
    Vlans,
    Interface,
}

impl ConsistencyType {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Vni => "vni",
            Self::Vlans => "vlans",
            Self::Interface => "interface",
        }
    }
}

// ── Hardware ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ModuleArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this slot
    #[arg(long)]
    pub module: Option<String>,
}

#[derive(Debug, Args)]
pub struct LocatorLedArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Print only LEDs that are lit
    #[arg(long)]
    pub on: bool,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// NX-OS and BIOS versions, uptime
    Version(PlainArgs),

    /// Boot variables
    Boot(PlainArgs),

    /// System mode (normal, maintenance)
    Mode(PlainArgs),

    /// License host ID
    HostId(PlainArgs),

    /// Installed virtual services
    VirtualService(PlainArgs),

    /// Physical memory per process
    Memory(MemoryArgs),
}

#[derive(Debug, Args)]
pub struct MemoryArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Add up processes that share a name
    #[arg(long)]
    pub summed: bool,
}

#[derive(Debug, Args)]
pub struct DirArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Filesystem or path to list
    #[arg(long, default_value = "bootflash:")]
    pub target: String,
}

// ── Layer 2 ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LldpArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only the neighbor on this local port
    #[arg(long, short = 'i')]
    pub interface: Option<String>,
}

#[derive(Debug, Args)]
pub struct MacCountArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this VLAN
    #[arg(long)]
    pub vlan: Option<String>,
}

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// VLAN ID
    #[arg(long)]
    pub vlan: String,
}

// ── Routing ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VrfArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this VRF
    #[arg(long)]
    pub vrf: Option<String>,
}

#[derive(Debug, Args)]
pub struct NveArgs {
    #[command(subcommand)]
    pub command: NveCommand,
}

#[derive(Debug, Subcommand)]
pub enum NveCommand {
    /// VXLAN tunnel peers
    Peers(NvePeersArgs),

    /// The nve1 interface
    Interface(PlainArgs),
}

#[derive(Debug, Args)]
pub struct NvePeersArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Only this peer
    #[arg(long)]
    pub peer: Option<String>,

    /// Print only peers that are not up
    #[arg(long)]
    pub down: bool,
}

#[derive(Debug, Args)]
pub struct Ipv6NeighborArgs {
    #[command(subcommand)]
    pub command: Ipv6NeighborCommand,
}

#[derive(Debug, Subcommand)]
pub enum Ipv6NeighborCommand {
    /// Cache entries
    List(Ipv6NeighborListArgs),

    /// Entry counts by kind
    Summary(Ipv6NeighborSummaryArgs),
}

#[derive(Debug, Args)]
pub struct Ipv6NeighborListArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// Only this neighbor
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Args)]
pub struct Ipv6NeighborSummaryArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,
}

#[derive(Debug, Args)]
pub struct RouteSummaryArgs {
    #[command(flatten)]
    pub targets: Targets,

    #[command(flatten)]
    pub vrf: VrfOpt,

    /// IPv6 RIB
    #[arg(long)]
    pub ipv6: bool,

    #[command(flatten)]
    pub range: MaskRange,
}

// ── Raw ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// Use the jsonrpc envelope instead of ins_api
    #[arg(long)]
    pub jsonrpc: bool,

    /// The show command, e.g. `show clock`
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    pub command: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConfArgs {
    #[command(flatten)]
    pub targets: Targets,

    /// File of configuration statements; `!` and `#` lines are skipped
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration with passwords masked
    Show,

    /// Print the config file location
    Path,

    /// Add or replace an inventory entry
    AddDevice {
        /// Inventory name
        name: String,

        /// Management address or hostname
        #[arg(long)]
        address: String,

        /// Login name for this device only
        #[arg(long = "device-username")]
        device_username: Option<String>,
    },

    /// Remove an inventory entry
    RemoveDevice {
        /// Inventory name
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
