//! `nxfleet system ...` and `nxfleet dir`.

use std::collections::BTreeMap;

use nxfleet_core::entity::system::{
    Boot, Dir, LicenseHostId, ProcessesMemory, SystemMode, Version, VirtualService, is_dir_target,
};
use nxfleet_core::{CoreError, DeviceSession, Entity, NA};

use super::{Context, util};
use crate::cli::{DirArgs, OutputFormat, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: SystemArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        SystemCommand::Version(a) => ctx.run(&a.targets, |s| version(s, format)).await,
        SystemCommand::Boot(a) => ctx.run(&a.targets, |s| boot(s, format)).await,
        SystemCommand::Mode(a) => ctx.run(&a.targets, |s| mode(s, format)).await,
        SystemCommand::HostId(a) => ctx.run(&a.targets, |s| host_id(s, format)).await,
        SystemCommand::VirtualService(a) => {
            ctx.run(&a.targets, |s| virtual_service(s, format)).await;
        }
        SystemCommand::Memory(a) => {
            let summed = a.summed;
            ctx.run(&a.targets, |s| memory(s, summed, format)).await;
        }
    }
    Ok(())
}

pub async fn dir(args: DirArgs, ctx: &Context) -> Result<(), CliError> {
    util::check("target", &args.target, is_dir_target)?;
    let format = ctx.format;
    let target = args.target.as_str();
    ctx.run(&args.targets, |s| dir_lines(s, target, format)).await;
    Ok(())
}

/// `device hostname version bios chassis serial uptime-secs reset-reason`
async fn version(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut v = Version::new();
    let code = v.refresh(&mut s.client).await?;
    let rows = vec![row![
        v.hostname(),
        v.nxos_version(),
        v.bios_version(),
        v.serial(),
        v.uptime_secs(),
        v.image(),
        format!("\"{}\"", v.chassis()),
        format!("\"{}\"", v.last_reset_reason()),
    ]];
    Ok(output::render(format, &s.device, code, &v, rows))
}

/// `device sup<n> current next poap`, one line per supervisor reported,
/// then `device reload-changes-image <bool>`.
async fn boot(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut b = Boot::new();
    let code = b.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for sup in 0..2 {
        if sup > 0 && b.sup_number(sup) == NA {
            break;
        }
        rows.push(row![
            format!("sup{sup}"),
            b.current_image(sup),
            b.next_image(sup),
            b.poap_status(sup),
        ]);
    }
    rows.push(row!["reload-changes-image", b.reload_changes_image()]);
    Ok(output::render(format, &s.device, code, &b, rows))
}

async fn mode(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut m = SystemMode::new();
    let code = m.refresh(&mut s.client).await?;
    let rows = vec![row![m.mode()]];
    Ok(output::render(format, &s.device, code, &m, rows))
}

async fn host_id(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut h = LicenseHostId::new();
    let code = h.refresh(&mut s.client).await?;
    let rows = vec![row![h.host_id()]];
    Ok(output::render(format, &s.device, code, &h, rows))
}

/// `device name status package`
async fn virtual_service(
    mut s: DeviceSession,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut vs = VirtualService::new();
    let code = vs.refresh(&mut s.client).await?;
    let rows = vs
        .names()
        .map(|name| row![name, vs.status(name), vs.package(name)])
        .collect();
    Ok(output::render(format, &s.device, code, &vs, rows))
}

/// `device pid name bytes`, or `device name bytes` per process name with
/// `--summed`; `device total bytes` last either way.
async fn memory(
    mut s: DeviceSession,
    summed: bool,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut pm = ProcessesMemory::new();
    let code = pm.refresh(&mut s.client).await?;

    let mut rows: Vec<Vec<String>> = if summed {
        let mut by_name: BTreeMap<String, i64> = BTreeMap::new();
        for pid in pm.pids() {
            *by_name.entry(pm.process(pid)).or_default() += pm.memory(pid).max(0);
        }
        by_name.into_iter().map(|(name, bytes)| row![name, bytes]).collect()
    } else {
        pm.pids()
            .map(|pid| row![pid, pm.process(pid), pm.memory(pid)])
            .collect()
    };
    rows.push(row!["total", pm.total_memory()]);
    Ok(output::render(format, &s.device, code, &pm, rows))
}

/// `device file bytes "timestamp"`, then used/free/total for the target.
async fn dir_lines(
    mut s: DeviceSession,
    target: &str,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut d = Dir::new();
    d.set_target(target);
    let code = d.refresh(&mut s.client).await?;

    let mut rows: Vec<Vec<String>> = d
        .files()
        .map(|f| row![f, d.size(f), format!("\"{}\"", d.timestamp(f))])
        .collect();
    rows.push(row![
        d.target(),
        "used",
        d.bytes_used(),
        "free",
        d.bytes_free(),
        "total",
        d.bytes_total(),
    ]);
    Ok(output::render(format, &s.device, code, &d, rows))
}
