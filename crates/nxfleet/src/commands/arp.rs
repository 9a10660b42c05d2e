//! `nxfleet arp`: adjacency counts for one VRF.

use nxfleet_core::entity::arp::ArpSummary;
use nxfleet_core::entity::is_vrf_name;
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{ArpArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: ArpArgs, ctx: &Context) -> Result<(), CliError> {
    util::check("vrf", &args.vrf.vrf, is_vrf_name)?;
    let format = ctx.format;
    let vrf = args.vrf.vrf.as_str();
    ctx.run(&args.targets, |s| summary(s, vrf, format)).await;
    Ok(())
}

/// `device vrf resolved incomplete throttled unknown total`
async fn summary(
    mut s: DeviceSession,
    vrf: &str,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut arp = ArpSummary::new();
    arp.set_vrf(vrf);
    let code = arp.refresh(&mut s.client).await?;
    let rows = vec![row![
        arp.vrf(),
        arp.resolved(),
        arp.incomplete(),
        arp.throttled(),
        arp.unknown(),
        arp.total(),
    ]];
    Ok(output::render(format, &s.device, code, &arp, rows))
}
