//! `nxfleet bfd`: BFD session detail.

use nxfleet_core::entity::bfd::BfdNeighbors;
use nxfleet_core::{CoreError, DeviceSession, Entity, Family};

use super::{Context, util};
use crate::cli::{BfdArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: BfdArgs, ctx: &Context) -> Result<(), CliError> {
    let family = Family::from_ipv6_flag(args.ipv6);
    util::check_opt("dest", args.dest.as_deref(), |x| family.is_address(x))?;
    let format = ctx.format;
    ctx.run(&args.targets, |s| sessions(s, &args, format)).await;
    Ok(())
}

/// `device local-disc remote-disc state dest src interface vrf tx rx mult
/// detect-timer up-secs`
async fn sessions(
    mut s: DeviceSession,
    args: &BfdArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut bfd = BfdNeighbors::new(Family::from_ipv6_flag(args.ipv6));
    let code = bfd.refresh(&mut s.client).await?;

    let discs = match args.dest {
        Some(ref dest) => bfd.local_disc_for(dest).map(str::to_owned).into_iter().collect(),
        None => util::owned(bfd.local_discs()),
    };
    let mut rows = Vec::with_capacity(discs.len());
    for disc in &discs {
        bfd.set_local_disc(disc);
        rows.push(row![
            disc,
            bfd.remote_disc(),
            bfd.state(),
            bfd.dest(),
            bfd.src(),
            bfd.interface(),
            bfd.vrf(),
            bfd.tx_interval(),
            bfd.rx_interval(),
            bfd.multiplier(),
            bfd.detect_timer(),
            bfd.up_time_secs(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &bfd, rows))
}
