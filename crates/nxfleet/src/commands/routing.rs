//! `nxfleet vrf`, `ipv6-neighbor` and `route-summary`.

use nxfleet_api::verify;
use nxfleet_core::entity::is_vrf_name;
use nxfleet_core::entity::routing::{Ipv6NeighborSummary, Ipv6Neighbors, RouteSummary, Vrf};
use nxfleet_core::{CoreError, DeviceSession, Entity, Family};

use super::{Context, util};
use crate::cli::{
    Ipv6NeighborArgs, Ipv6NeighborCommand, Ipv6NeighborListArgs, OutputFormat, RouteSummaryArgs,
    VrfArgs,
};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn vrf(args: VrfArgs, ctx: &Context) -> Result<(), CliError> {
    util::check_opt("vrf", args.vrf.as_deref(), is_vrf_name)?;
    let format = ctx.format;
    let only = args.vrf.as_deref();
    ctx.run(&args.targets, |s| vrf_lines(s, only, format)).await;
    Ok(())
}

pub async fn ipv6_neighbor(args: Ipv6NeighborArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        Ipv6NeighborCommand::List(a) => {
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            util::check_opt("address", a.address.as_deref(), verify::is_ipv6)?;
            ctx.run(&a.targets, |s| neighbor_lines(s, &a, format)).await;
        }
        Ipv6NeighborCommand::Summary(a) => {
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            let vrf = a.vrf.vrf.as_str();
            ctx.run(&a.targets, |s| neighbor_summary(s, vrf, format)).await;
        }
    }
    Ok(())
}

pub async fn route_summary(args: RouteSummaryArgs, ctx: &Context) -> Result<(), CliError> {
    util::check("vrf", &args.vrf.vrf, is_vrf_name)?;
    let window = util::mask_window(&args.range, Family::from_ipv6_flag(args.ipv6))?;
    let format = ctx.format;
    ctx.run(&args.targets, |s| route_lines(s, &args, window, format)).await;
    Ok(())
}

/// `device vrf id state reason`
async fn vrf_lines(
    mut s: DeviceSession,
    only: Option<&str>,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut v = Vrf::new();
    let code = v.refresh(&mut s.client).await?;

    let names = match only {
        Some(name) => vec![name.to_owned()],
        None => util::owned(v.names()),
    };
    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        v.set_vrf(name);
        rows.push(row![name, v.id(), v.state(), v.reason()]);
    }
    Ok(output::render(format, &s.device, code, &v, rows))
}

/// `device address mac interface physical-interface age-secs`
async fn neighbor_lines(
    mut s: DeviceSession,
    args: &Ipv6NeighborListArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut nd = Ipv6Neighbors::new();
    nd.set_vrf(&args.vrf.vrf);
    let code = nd.refresh(&mut s.client).await?;

    let addresses = match args.address {
        Some(ref a) => vec![a.clone()],
        None => util::owned(nd.addresses()),
    };
    let mut rows = Vec::with_capacity(addresses.len());
    for address in &addresses {
        nd.set_address(address);
        rows.push(row![
            address,
            nd.mac(),
            nd.interface(),
            nd.physical_interface(),
            nd.age_secs(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &nd, rows))
}

/// `device vrf static dynamic other throttled total`
async fn neighbor_summary(
    mut s: DeviceSession,
    vrf: &str,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut nd = Ipv6NeighborSummary::new();
    nd.set_vrf(vrf);
    let code = nd.refresh(&mut s.client).await?;
    let rows = vec![row![
        vrf,
        nd.static_entries(),
        nd.dynamic_entries(),
        nd.other_entries(),
        nd.throttled_entries(),
        nd.total(),
    ]];
    Ok(output::render(format, &s.device, code, &nd, rows))
}

/// `device routes paths in-window`, `device /len count` per mask inside the
/// window, then `device client best-paths` per routing client.
async fn route_lines(
    mut s: DeviceSession,
    args: &RouteSummaryArgs,
    (ge, le): (i64, i64),
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut rib = RouteSummary::new(Family::from_ipv6_flag(args.ipv6));
    rib.set_vrf(&args.vrf.vrf);
    let code = rib.refresh(&mut s.client).await?;

    let mut rows = vec![row![rib.routes(), rib.paths(), rib.routes_in_mask_range(ge, le)]];
    rows.extend(
        rib.routes_per_mask()
            .iter()
            .filter(|(len, _)| (ge..=le).contains(*len))
            .map(|(len, count)| row![format!("/{len}"), count]),
    );
    rows.extend(
        rib.clients()
            .map(|client| row![client, rib.best_paths(client)]),
    );
    Ok(output::render(format, &s.device, code, &rib, rows))
}
