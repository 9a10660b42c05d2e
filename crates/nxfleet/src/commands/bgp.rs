//! `nxfleet bgp`: neighbors, peer summaries, prefixes and process state.

use nxfleet_api::verify;
use nxfleet_core::entity::bgp::{BgpNeighbors, BgpPrefix, BgpProcess, BgpSummary, BgpSummaryFamily};
use nxfleet_core::entity::is_vrf_name;
use nxfleet_core::{CoreError, DeviceSession, Entity, Family};

use super::{Context, util};
use crate::cli::{
    BgpArgs, BgpCommand, BgpNeighborsArgs, BgpPrefixArgs, BgpProcessArgs, OutputFormat,
};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: BgpArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        BgpCommand::Neighbors(a) => {
            let family = Family::from_ipv6_flag(a.ipv6);
            util::check_opt("neighbor", a.neighbor.as_deref(), |x| match family {
                Family::Ipv4 => verify::is_ipv4(x),
                Family::Ipv6 => verify::is_ip(x),
            })?;
            ctx.run(&a.targets, |s| neighbors(s, &a, format)).await;
        }
        BgpCommand::Summary(a) => {
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            let family = if a.ipv6 {
                BgpSummaryFamily::Ipv6Unicast
            } else {
                BgpSummaryFamily::Ipv4Unicast
            };
            let (vrf, nonzero) = (a.vrf.vrf.as_str(), a.nonzero);
            ctx.run(&a.targets, |s| summary(s, family, vrf, nonzero, format))
                .await;
        }
        BgpCommand::Evpn(a) => {
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            let (vrf, nonzero) = (a.vrf.vrf.as_str(), a.nonzero);
            ctx.run(&a.targets, |s| {
                summary(s, BgpSummaryFamily::L2vpnEvpn, vrf, nonzero, format)
            })
            .await;
        }
        BgpCommand::Prefix(a) => {
            util::check("prefix", &a.prefix, verify::is_ipv4_prefix)?;
            ctx.run(&a.targets, |s| prefix(s, &a, format)).await;
        }
        BgpCommand::Process(a) => {
            util::check_opt("vrf", a.vrf.as_deref(), is_vrf_name)?;
            ctx.run(&a.targets, |s| process(s, &a, format)).await;
        }
    }
    Ok(())
}

/// `device peer state remote-as local-as router-id hold keepalive elapsed-secs
/// msgs-rcvd msgs-sent`
async fn neighbors(
    mut s: DeviceSession,
    args: &BgpNeighborsArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut bgp = BgpNeighbors::new(Family::from_ipv6_flag(args.ipv6));
    let code = bgp.refresh(&mut s.client).await?;

    let peers = match args.neighbor {
        Some(ref n) => vec![n.clone()],
        None => util::owned(bgp.neighbors()),
    };
    let mut rows = Vec::with_capacity(peers.len());
    for peer in &peers {
        bgp.set_neighbor(peer);
        rows.push(row![
            peer,
            bgp.state(),
            bgp.remote_as(),
            bgp.local_as(),
            bgp.router_id(),
            bgp.hold_time(),
            bgp.keepalive_time(),
            bgp.elapsed_secs(),
            bgp.messages_received(),
            bgp.messages_sent(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &bgp, rows))
}

/// `device peer state remote-as prefixes-rcvd up-secs`
async fn summary(
    mut s: DeviceSession,
    family: BgpSummaryFamily,
    vrf: &str,
    nonzero: bool,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut bgp = BgpSummary::new(family);
    bgp.set_vrf(vrf);
    let code = bgp.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for peer in util::owned(bgp.neighbors()) {
        bgp.set_neighbor(&peer);
        if nonzero && bgp.prefixes_received() <= 0 {
            continue;
        }
        rows.push(row![
            peer,
            bgp.state(),
            bgp.remote_as(),
            bgp.prefixes_received(),
            bgp.up_time_secs(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &bgp, rows))
}

/// `device prefix paths best-nexthop best-as-path best-local-pref version`
async fn prefix(
    mut s: DeviceSession,
    args: &BgpPrefixArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut bgp = BgpPrefix::new();
    bgp.set_prefix(&args.prefix);
    let code = bgp.refresh(&mut s.client).await?;
    let rows = vec![row![
        args.prefix,
        bgp.path_count(),
        bgp.best_next_hop(),
        bgp.best_as_path(),
        bgp.best_local_pref(),
        bgp.prefix_version(),
    ]];
    Ok(output::render(format, &s.device, code, &bgp, rows))
}

/// `device asn pid state` for the process, or `device vrf router-id state
/// peers established` per VRF.
async fn process(
    mut s: DeviceSession,
    args: &BgpProcessArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut bgp = BgpProcess::new();
    let code = bgp.refresh(&mut s.client).await?;

    let mut rows = vec![row![
        "process",
        bgp.asn(),
        bgp.process_id(),
        bgp.protocol_state(),
        bgp.memory_state(),
    ]];
    let vrfs = match args.vrf {
        Some(ref v) => vec![v.clone()],
        None => util::owned(bgp.vrf_names()),
    };
    for vrf in &vrfs {
        bgp.set_vrf(vrf);
        rows.push(row![
            vrf,
            bgp.vrf_router_id(),
            bgp.vrf_state(),
            bgp.vrf_peers(),
            bgp.vrf_established_peers(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &bgp, rows))
}
