//! `nxfleet lldp`, `mac-count` and `vlan`.

use nxfleet_api::verify;
use nxfleet_core::entity::is_interface_name;
use nxfleet_core::entity::l2::{LldpNeighbors, MacCount, Vlan};
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{LldpArgs, MacCountArgs, OutputFormat, VlanArgs};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn lldp(args: LldpArgs, ctx: &Context) -> Result<(), CliError> {
    util::check_opt("interface", args.interface.as_deref(), is_interface_name)?;
    let format = ctx.format;
    let only = args.interface.as_deref();
    ctx.run(&args.targets, |s| lldp_lines(s, only, format)).await;
    Ok(())
}

pub async fn mac_count(args: MacCountArgs, ctx: &Context) -> Result<(), CliError> {
    util::check_opt("vlan", args.vlan.as_deref(), verify::is_vlan)?;
    let format = ctx.format;
    let vlan = args.vlan.as_deref();
    ctx.run(&args.targets, |s| mac_count_lines(s, vlan, format)).await;
    Ok(())
}

pub async fn vlan(args: VlanArgs, ctx: &Context) -> Result<(), CliError> {
    util::check("vlan", &args.vlan, verify::is_vlan)?;
    let format = ctx.format;
    let id = args.vlan.as_str();
    ctx.run(&args.targets, |s| vlan_lines(s, id, format)).await;
    Ok(())
}

/// `device local-port system-name port-id chassis-id capability hold`
async fn lldp_lines(
    mut s: DeviceSession,
    only: Option<&str>,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut lldp = LldpNeighbors::new();
    let code = lldp.refresh(&mut s.client).await?;

    let ports = match only {
        Some(port) => vec![port.to_owned()],
        None => util::owned(lldp.local_ports()),
    };
    let mut rows = Vec::with_capacity(ports.len());
    for port in &ports {
        lldp.set_interface(port);
        rows.push(row![
            port,
            lldp.system_name(),
            lldp.port_id(),
            lldp.chassis_id(),
            lldp.capability(),
            lldp.hold_time(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &lldp, rows))
}

/// `device vlan dynamic static secure overlay otv rvtep-static total`
async fn mac_count_lines(
    mut s: DeviceSession,
    vlan: Option<&str>,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut mac = MacCount::new();
    if let Some(v) = vlan {
        mac.set_vlan(v);
    }
    let code = mac.refresh(&mut s.client).await?;
    let rows = vec![row![
        vlan.unwrap_or("all"),
        mac.dynamic(),
        mac.static_(),
        mac.secure(),
        mac.overlay(),
        mac.otv(),
        mac.rvtep_static(),
        mac.total(),
    ]];
    Ok(output::render(format, &s.device, code, &mac, rows))
}

/// `device vlan name state shutdown mode mtu ports`
async fn vlan_lines(
    mut s: DeviceSession,
    id: &str,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut v = Vlan::new();
    v.set_vlan(id);
    let code = v.refresh(&mut s.client).await?;
    let rows = vec![row![
        id,
        v.name(),
        v.state(),
        v.shutdown_state(),
        v.mode(),
        v.mtu(),
        v.ports(),
    ]];
    Ok(output::render(format, &s.device, code, &v, rows))
}
