//! `nxfleet fib`: hardware forwarding entries and per-mask route counts.

use nxfleet_api::verify;
use nxfleet_core::entity::forwarding::{ForwardingRoute, ForwardingRouteSummary};
use nxfleet_core::entity::is_vrf_name;
use nxfleet_core::{CoreError, DeviceSession, Entity, Family};

use super::{Context, util};
use crate::cli::{FibArgs, FibCommand, FibRouteArgs, FibSummaryArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: FibArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        FibCommand::Route(a) => {
            let family = Family::from_ipv6_flag(a.ipv6);
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            util::check("module", &a.module, verify::is_module)?;
            util::check("prefix", &a.prefix, |x| family.is_prefix(x))?;
            ctx.run(&a.targets, |s| route(s, &a, format)).await;
        }
        FibCommand::Summary(a) => {
            let family = Family::from_ipv6_flag(a.ipv6);
            util::check("vrf", &a.vrf.vrf, is_vrf_name)?;
            util::check("module", &a.module, verify::is_module)?;
            let window = util::mask_window(&a.range, family)?;
            ctx.run(&a.targets, |s| summary(s, &a, window, format)).await;
        }
    }
    Ok(())
}

/// One line per path: `device prefix nexthop interface partial`. A prefix
/// with no paths still prints one line of sentinels.
async fn route(
    mut s: DeviceSession,
    args: &FibRouteArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut fib = ForwardingRoute::new(Family::from_ipv6_flag(args.ipv6));
    fib.set_vrf(&args.vrf.vrf);
    fib.set_module(&args.module);
    fib.set_prefix(&args.prefix);
    let code = fib.refresh(&mut s.client).await?;

    let partial = fib.partial_install();
    let hops = fib.next_hops();
    let rows = if hops.is_empty() {
        vec![row![args.prefix, nxfleet_core::NA, nxfleet_core::NA, partial]]
    } else {
        hops.iter()
            .zip(fib.interfaces())
            .map(|(hop, ifname)| row![args.prefix, hop, ifname, partial])
            .collect()
    };
    Ok(output::render(format, &s.device, code, &fib, rows))
}

/// `device routes paths in-window updates inserts deletes`, then
/// `device /len count` for each populated mask inside the window.
async fn summary(
    mut s: DeviceSession,
    args: &FibSummaryArgs,
    (ge, le): (i64, i64),
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut fib = ForwardingRouteSummary::new(Family::from_ipv6_flag(args.ipv6));
    fib.set_vrf(&args.vrf.vrf);
    fib.set_module(&args.module);
    let code = fib.refresh(&mut s.client).await?;

    let mut rows = vec![row![
        fib.route_count(),
        fib.path_count(),
        fib.routes_in_mask_range(ge, le),
        fib.route_update_count(),
        fib.route_insert_count(),
        fib.route_delete_count(),
    ]];
    rows.extend(
        fib.routes_per_mask()
            .iter()
            .filter(|(len, _)| (ge..=le).contains(*len))
            .map(|(len, count)| row![format!("/{len}"), count]),
    );
    Ok(output::render(format, &s.device, code, &fib, rows))
}
