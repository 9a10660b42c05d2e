//! `nxfleet interface`: counters, status lines and transceivers.

use nxfleet_core::entity::interface::{Interface, InterfaceStatus, InterfaceTransceiver};
use nxfleet_core::entity::is_interface_name;
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{
    InterfaceArgs, InterfaceCommand, InterfaceCountersArgs, InterfaceOpt, OutputFormat,
    TransceiverArgs,
};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: InterfaceArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        InterfaceCommand::Counters(a) => {
            util::check_opt("interface", a.interface.as_deref(), is_interface_name)?;
            ctx.run(&a.targets, |s| counters(s, &a, format)).await;
        }
        InterfaceCommand::Status(a) => {
            util::check_opt("interface", a.interface.as_deref(), is_interface_name)?;
            ctx.run(&a.targets, |s| status(s, &a, format)).await;
        }
        InterfaceCommand::Transceiver(a) => {
            util::check_opt("interface", a.interface.as_deref(), is_interface_name)?;
            ctx.run(&a.targets, |s| transceiver(s, &a, format)).await;
        }
    }
    Ok(())
}

/// Per interface: `device if state admin-state mtu speed in-bps out-bps
/// flapped-secs`, then `device if counter value` for each counter.
async fn counters(
    mut s: DeviceSession,
    args: &InterfaceCountersArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut intf = match args.interface {
        Some(ref i) => {
            let mut one = Interface::new();
            one.set_interface(i);
            one
        }
        None => Interface::all(),
    };
    let code = intf.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for name in util::owned(intf.interfaces()) {
        intf.set_interface(&name);
        rows.push(row![
            name,
            intf.state(),
            intf.admin_state(),
            intf.mtu(),
            intf.speed(),
            intf.in_rate_bps(),
            intf.out_rate_bps(),
            intf.link_flapped_secs(),
        ]);
        for (counter, value) in intf.counters() {
            if args.nonzero && value <= 0 {
                continue;
            }
            rows.push(row![name, counter, value]);
        }
    }
    Ok(output::render(format, &s.device, code, &intf, rows))
}

/// `device if state vlan duplex speed type`
async fn status(
    mut s: DeviceSession,
    args: &InterfaceOpt,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut st = InterfaceStatus::new();
    if let Some(ref i) = args.interface {
        st.set_interface(i);
    }
    let code = st.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for name in util::owned(st.interfaces()) {
        st.set_interface(&name);
        rows.push(row![
            name,
            st.state(),
            st.vlan(),
            st.duplex(),
            st.speed(),
            st.port_type(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &st, rows))
}

/// `device if present vendor part serial type bitrate`
async fn transceiver(
    mut s: DeviceSession,
    args: &TransceiverArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut xcvr = InterfaceTransceiver::new();
    if let Some(ref i) = args.interface {
        xcvr.set_interface(i);
    }
    let code = xcvr.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for name in util::owned(xcvr.interfaces()) {
        xcvr.set_interface(&name);
        if args.present && !xcvr.is_present() {
            continue;
        }
        rows.push(row![
            name,
            xcvr.is_present(),
            xcvr.vendor(),
            xcvr.part_number(),
            xcvr.serial_number(),
            xcvr.kind(),
            xcvr.bitrate(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &xcvr, rows))
}
