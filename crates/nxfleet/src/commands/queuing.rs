//! `nxfleet queuing`: egress queue counters.

use nxfleet_core::entity::is_interface_name;
use nxfleet_core::entity::queuing::{InterfaceQueuing, QueuingTabular, StatCounters};
use nxfleet_core::normalize::scalar_text;
use nxfleet_core::{CoreError, DeviceSession, Entity, NA};

use super::{Context, util};
use crate::cli::{OutputFormat, QueuingArgs, QueuingCommand, QueuingEgressArgs};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: QueuingArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        QueuingCommand::Egress(a) => {
            util::check("interface", &a.interface, is_interface_name)?;
            ctx.run(&a.targets, |s| egress(s, &a, format)).await;
        }
        QueuingCommand::Tabular(a) => {
            util::check("interface", &a.interface, is_interface_name)?;
            let interface = a.interface.as_str();
            ctx.run(&a.targets, |s| tabular(s, interface, format)).await;
        }
    }
    Ok(())
}

fn stat_rows(group: &str, stats: &StatCounters, nonzero: bool) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (stat, units) in stats {
        for (unit, c) in units {
            if nonzero && c.is_zero() {
                continue;
            }
            rows.push(row![group, stat, unit, c.uc, c.mc]);
        }
    }
    rows
}

/// `device group stat unit uc mc`; `--summed` folds every group into `all`.
async fn egress(
    mut s: DeviceSession,
    args: &QueuingEgressArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut q = InterfaceQueuing::new();
    q.set_interface(&args.interface);
    let code = q.refresh(&mut s.client).await?;

    let rows = if args.summed {
        stat_rows("all", &q.summed(), args.nonzero)
    } else {
        q.groups()
            .iter()
            .flat_map(|(group, stats)| stat_rows(group, stats, args.nonzero))
            .collect()
    };
    Ok(output::render(format, &s.device, code, &q, rows))
}

/// `device group field value`
async fn tabular(
    mut s: DeviceSession,
    interface: &str,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut q = QueuingTabular::new();
    q.set_interface(interface);
    let code = q.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for (group, fields) in q.groups() {
        for (field, value) in fields {
            let text = scalar_text(value).unwrap_or_else(|| NA.to_owned());
            rows.push(row![group, field, text]);
        }
    }
    Ok(output::render(format, &s.device, code, &q, rows))
}
