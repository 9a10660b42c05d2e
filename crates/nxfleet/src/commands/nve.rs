//! `nxfleet nve`: VXLAN peers and the nve1 interface.

use nxfleet_api::verify;
use nxfleet_core::entity::nve::{NveInterface, NvePeers};
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{NveArgs, NveCommand, NvePeersArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: NveArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        NveCommand::Peers(a) => {
            util::check_opt("peer", a.peer.as_deref(), verify::is_ip)?;
            ctx.run(&a.targets, |s| peers(s, &a, format)).await;
        }
        NveCommand::Interface(a) => {
            ctx.run(&a.targets, |s| interface(s, format)).await;
        }
    }
    Ok(())
}

/// `device peer state nve learn-type router-mac up-secs`
async fn peers(
    mut s: DeviceSession,
    args: &NvePeersArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut nve = NvePeers::new();
    let code = nve.refresh(&mut s.client).await?;

    let selected = match (&args.peer, args.down) {
        (Some(p), _) => vec![p.clone()],
        (None, true) => util::owned(nve.down_peers().into_iter()),
        (None, false) => util::owned(nve.peers()),
    };
    let mut rows = Vec::with_capacity(selected.len());
    for peer in &selected {
        nve.set_peer(peer);
        rows.push(row![
            peer,
            nve.state(),
            nve.nve_interface(),
            nve.learn_type(),
            nve.router_mac(),
            nve.uptime_secs(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &nve, rows))
}

/// `device state encap source source-state primary secondary host-reach
/// rmac vpc-capability`
async fn interface(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut nve = NveInterface::new();
    let code = nve.refresh(&mut s.client).await?;
    let rows = vec![row![
        nve.state(),
        nve.encapsulation(),
        nve.source_interface(),
        nve.source_interface_state(),
        nve.primary_ip(),
        nve.secondary_ip(),
        nve.host_reachability(),
        nve.router_mac(),
        nve.vpc_capability(),
    ]];
    Ok(output::render(format, &s.device, code, &nve, rows))
}
