//! `nxfleet vpc`: vPC domain state and peer consistency.

use nxfleet_core::entity::vpc::{ConsistencyKind, Vpc, VpcConsistency};
use nxfleet_core::{CoreError, DeviceSession, Entity};

use super::Context;
use crate::cli::{ConsistencyType, OutputFormat, VpcArgs, VpcCommand};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn handle(args: VpcArgs, ctx: &Context) -> Result<(), CliError> {
    let format = ctx.format;
    match args.command {
        VpcCommand::Status(a) => {
            ctx.run(&a.targets, |s| status(s, format)).await;
        }
        VpcCommand::Consistency(a) => {
            let kind = consistency_kind(a.kind, a.interface.as_deref())?;
            let kind = &kind;
            ctx.run(&a.targets, |s| consistency(s, kind.clone(), format))
                .await;
        }
    }
    Ok(())
}

fn consistency_kind(
    kind: ConsistencyType,
    interface: Option<&str>,
) -> Result<ConsistencyKind, CliError> {
    if kind == ConsistencyType::Interface && interface.is_none() {
        return Err(CliError::validation("interface", "required with --type interface"));
    }
    ConsistencyKind::parse(kind.keyword(), interface).ok_or_else(|| {
        let shown = interface.unwrap_or_default();
        CliError::validation("interface", format!("'{shown}' is not valid"))
    })
}

/// `device domain role peer-status keepalive consistency type2 count`, the
/// peer-link line, then `device vpc-id interface state consistency`.
async fn status(mut s: DeviceSession, format: OutputFormat) -> Result<Vec<String>, CoreError> {
    let mut vpc = Vpc::new();
    let code = vpc.refresh(&mut s.client).await?;

    let mut rows = vec![
        row![
            "domain",
            vpc.domain_id(),
            vpc.role(),
            vpc.peer_status(),
            vpc.keepalive_status(),
            vpc.peer_consistency(),
            vpc.type2_consistency(),
            vpc.vpc_count(),
        ],
        row![
            "peer-link",
            vpc.peerlink_interface(),
            vpc.peerlink_state(),
            vpc.peerlink_vlans(),
        ],
    ];
    for id in vpc.vpc_ids() {
        rows.push(row![
            id,
            vpc.vpc_interface(id),
            vpc.vpc_state(id),
            vpc.vpc_consistency(id),
        ]);
    }
    Ok(output::render(format, &s.device, code, &vpc, rows))
}

/// A `device params <n> inconsistent <m>` line, `device param local peer`
/// for every inconsistent parameter, then
/// `device vlan <id>` for each inconsistent VLAN and `device mismatched
/// <label>` for records whose name and local value counts differ.
async fn consistency(
    mut s: DeviceSession,
    kind: ConsistencyKind,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let mut cc = VpcConsistency::new(kind);
    let code = cc.refresh(&mut s.client).await?;

    let inconsistent = cc.inconsistent_params();
    let mut rows = vec![row!["params", cc.params().len(), "inconsistent", inconsistent.len()]];
    rows.extend(inconsistent.iter().map(|p| row![p.name, p.local, p.peer]));
    rows.extend(cc.inconsistent_vlans().into_iter().map(|v| row!["vlan", v]));
    rows.extend(cc.mismatched_labels().into_iter().map(|l| row!["mismatched", l]));
    Ok(output::render(format, &s.device, code, &cc, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_type_needs_an_interface() {
        assert!(consistency_kind(ConsistencyType::Interface, None).is_err());
        assert!(consistency_kind(ConsistencyType::Interface, Some("bad name")).is_err());
        assert_eq!(
            consistency_kind(ConsistencyType::Interface, Some("port-channel10")).ok(),
            Some(ConsistencyKind::Interface("port-channel10".into()))
        );
        assert_eq!(
            consistency_kind(ConsistencyType::Vlans, None).ok(),
            Some(ConsistencyKind::Vlans)
        );
    }
}
