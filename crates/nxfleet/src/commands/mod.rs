//! Command dispatch: CLI args -> per-device workers -> ordered output.
//!
//! Each tool validates its subject flags up front (bad input exits 2 before
//! any device is contacted), then hands an async worker to the fleet. A
//! worker refreshes one entity on one session and renders that device's
//! lines.

pub mod arp;
pub mod bfd;
pub mod bgp;
pub mod config_cmd;
pub mod fib;
pub mod hardware;
pub mod interface;
pub mod l2;
pub mod nve;
pub mod queuing;
pub mod raw;
pub mod routing;
pub mod system;
pub mod tcam;
pub mod util;
pub mod vpc;

use std::future::Future;

use nxfleet_core::{CoreError, DeviceSession};

use crate::cli::{Command, OutputFormat, Targets};
use crate::config::ConfiguredFleet;
use crate::error::CliError;
use crate::output;

/// What every worker needs from the run.
pub struct Context {
    fleet: ConfiguredFleet,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(fleet: ConfiguredFleet, format: OutputFormat) -> Self {
        Self { fleet, format }
    }

    /// Run `worker` on every target and print the gathered lines.
    pub async fn run<W, Fut>(&self, targets: &Targets, worker: W)
    where
        W: Fn(DeviceSession) -> Fut,
        Fut: Future<Output = Result<Vec<String>, CoreError>>,
    {
        let lines = self.fleet.dispatch(&targets.devices, worker).await;
        output::print_lines(&lines);
    }
}

/// Dispatch a device-bound command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Arp(args) => arp::handle(args, ctx).await,
        Command::Bgp(args) => bgp::handle(args, ctx).await,
        Command::Bfd(args) => bfd::handle(args, ctx).await,
        Command::Fib(args) => fib::handle(args, ctx).await,
        Command::Interface(args) => interface::handle(args, ctx).await,
        Command::Queuing(args) => queuing::handle(args, ctx).await,
        Command::Tcam(args) => tcam::handle(args, ctx).await,
        Command::Vpc(args) => vpc::handle(args, ctx).await,
        Command::Inventory(args) => hardware::inventory(args, ctx).await,
        Command::Module(args) => hardware::module(args, ctx).await,
        Command::LocatorLed(args) => hardware::locator_led(args, ctx).await,
        Command::System(args) => system::handle(args, ctx).await,
        Command::Dir(args) => system::dir(args, ctx).await,
        Command::Lldp(args) => l2::lldp(args, ctx).await,
        Command::MacCount(args) => l2::mac_count(args, ctx).await,
        Command::Vlan(args) => l2::vlan(args, ctx).await,
        Command::Vrf(args) => routing::vrf(args, ctx).await,
        Command::Nve(args) => nve::handle(args, ctx).await,
        Command::Ipv6Neighbor(args) => routing::ipv6_neighbor(args, ctx).await,
        Command::RouteSummary(args) => routing::route_summary(args, ctx).await,
        Command::Show(args) => raw::show(args, ctx).await,
        Command::Conf(args) => raw::conf(args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
