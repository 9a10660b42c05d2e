//! `nxfleet tcam`: ACL TCAM utilization per feature.

use nxfleet_api::verify;
use nxfleet_core::entity::tcam::AclTcam;
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::{Context, util};
use crate::cli::{OutputFormat, TcamArgs, TcamReduction};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: TcamArgs, ctx: &Context) -> Result<(), CliError> {
    util::check("module", &args.module, verify::is_module)?;
    for (field, pct) in [("ge", args.ge), ("le", args.le)] {
        if pct.is_some_and(|p| !(0.0..=100.0).contains(&p)) {
            return Err(CliError::validation(field, "percentage must be within 0-100"));
        }
    }
    let format = ctx.format;
    ctx.run(&args.targets, |s| utilization(s, &args, format)).await;
    Ok(())
}

fn within(args: &TcamArgs, percent: f64) -> bool {
    args.ge.is_none_or(|ge| percent >= ge) && args.le.is_none_or(|le| percent <= le)
}

/// `device feature used free percent title`, folded across instances by
/// `--type`; `--type all` prefixes each line with the instance instead.
async fn utilization(
    mut s: DeviceSession,
    args: &TcamArgs,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut tcam = AclTcam::new();
    tcam.set_module(&args.module);
    let code = tcam.refresh(&mut s.client).await?;

    let mut rows = Vec::new();
    for feature in tcam.features() {
        let title = tcam.title(feature);
        match args.reduction {
            TcamReduction::Max | TcamReduction::Min => {
                let (used, free, percent) = if args.reduction == TcamReduction::Max {
                    (tcam.max_used(feature), tcam.min_free(feature), tcam.max_percent(feature))
                } else {
                    (tcam.min_used(feature), tcam.max_free(feature), tcam.min_percent(feature))
                };
                if within(args, percent) {
                    rows.push(row![feature, used, free, percent, title]);
                }
            }
            TcamReduction::All => {
                for instance in tcam.instances() {
                    let Some(usage) = tcam.usage(instance, feature) else {
                        continue;
                    };
                    if within(args, usage.percent) {
                        rows.push(row![
                            instance,
                            feature,
                            usage.used,
                            usage.free,
                            usage.percent,
                            title,
                        ]);
                    }
                }
            }
        }
    }
    Ok(output::render(format, &s.device, code, &tcam, rows))
}
