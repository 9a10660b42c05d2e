//! `nxfleet inventory`, `module` and `locator-led`.

use nxfleet_api::verify;
use nxfleet_core::entity::hardware::{Inventory, LocatorLed, ModuleInfo};
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{LocatorLedArgs, ModuleArgs, OutputFormat, PlainArgs};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn inventory(args: PlainArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    ctx.run(&args.targets, |s| inventory_lines(s, format)).await;
    Ok(())
}

pub async fn module(args: ModuleArgs, ctx: &Context) -> Result<(), CliError> {
    util::check_opt("module", args.module.as_deref(), verify::is_module)?;
    let format = ctx.format;
    let only = args.module.as_deref();
    ctx.run(&args.targets, |s| module_lines(s, only, format)).await;
    Ok(())
}

pub async fn locator_led(args: LocatorLedArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    let on = args.on;
    ctx.run(&args.targets, |s| led_lines(s, on, format)).await;
    Ok(())
}

/// `device pid serial vid "name"`; the name goes last since it has spaces.
async fn inventory_lines(
    mut s: DeviceSession,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut inv = Inventory::new();
    let code = inv.refresh(&mut s.client).await?;
    let rows = inv
        .names()
        .map(|name| {
            row![
                inv.product_id(name),
                inv.serial(name),
                inv.version_id(name),
                format!("\"{name}\""),
            ]
        })
        .collect();
    Ok(output::render(format, &s.device, code, &inv, rows))
}

/// `device slot status ports model serial sw hw diag`
async fn module_lines(
    mut s: DeviceSession,
    only: Option<&str>,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut m = ModuleInfo::new();
    let code = m.refresh(&mut s.client).await?;

    let slots = match only {
        Some(slot) => vec![slot.to_owned()],
        None => util::owned(m.modules()),
    };
    let mut rows = Vec::with_capacity(slots.len());
    for slot in &slots {
        m.set_module(slot);
        rows.push(row![
            slot,
            m.status(),
            m.ports(),
            m.model(),
            m.serial(),
            m.software(),
            m.hardware(),
            m.diag_status(),
        ]);
    }
    Ok(output::render(format, &s.device, code, &m, rows))
}

/// `device "label" status`, or only lit LEDs with `--on`.
async fn led_lines(
    mut s: DeviceSession,
    on: bool,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut led = LocatorLed::new();
    let code = led.refresh(&mut s.client).await?;
    let lit = led.lit();
    let rows = led
        .leds()
        .iter()
        .filter(|(label, _)| !on || lit.contains(&label.as_str()))
        .map(|(label, status)| row![format!("\"{label}\""), status])
        .collect();
    Ok(output::render(format, &s.device, code, &led, rows))
}
