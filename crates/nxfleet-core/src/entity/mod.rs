//! Typed views over individual NX-OS CLIs.
//!
//! Every entity follows the same lifecycle:
//!
//! 1. Construct it and pick a subject (peer, interface, module, prefix...).
//!    Subject setters validate their input; a bad value is logged and ignored.
//! 2. Call [`Entity::refresh`] against a session. This sends exactly one CLI
//!    and rebuilds the views from the single body it returns.
//! 3. Read scalars. Anything absent, including everything before the first
//!    refresh, reads as a sentinel: [`NA`](crate::normalize::NA), `-1`, or `-1.0`.
//!
//! Entities never return errors for missing data. Only transport failures
//! surface from `refresh`.

pub mod arp;
pub mod bfd;
pub mod bgp;
pub mod forwarding;
pub mod hardware;
pub mod interface;
pub mod l2;
pub mod nve;
pub mod queuing;
pub mod routing;
pub mod system;
pub mod tcam;
pub mod vpc;

use std::future::Future;

use nxfleet_api::{NxapiClient, ResultCode};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::error::CoreError;

/// A typed view over one CLI.
pub trait Entity {
    /// CLI text sent on refresh.
    fn command(&self) -> String;

    /// Drop every derived view, returning the entity to its pre-refresh state.
    fn clear(&mut self);

    /// Rebuild views from one show body.
    fn load(&mut self, body: &Value);

    /// Top-level scalars of the last body (`TABLE_*` children removed).
    fn info(&self) -> &Map<String, Value>;

    /// Re-run the CLI and rebuild every view.
    fn refresh(
        &mut self,
        client: &mut NxapiClient,
    ) -> impl Future<Output = Result<ResultCode, CoreError>>
    where
        Self: Sized,
    {
        refresh_entity(self, client)
    }
}

/// One transport call plus one re-derivation.
///
/// The view is only rebuilt from a successful reply carrying exactly one
/// body; anything else leaves it empty.
pub async fn refresh_entity<E: Entity + ?Sized>(
    entity: &mut E,
    client: &mut NxapiClient,
) -> Result<ResultCode, CoreError> {
    let command = entity.command();
    entity.clear();

    let response = client.show(&command).await?;
    let code = response.code;
    match response.bodies.as_slice() {
        [body] if code.is_success() => entity.load(body),
        [_] => debug!(command, %code, "device reported failure, view left empty"),
        bodies => warn!(
            command,
            count = bodies.len(),
            "expected exactly one body, view left empty"
        ),
    }
    Ok(code)
}

// ── Subject validation ───────────────────────────────────────────────

/// Apply `value` to `slot` when `valid` holds, otherwise log and keep the old
/// subject.
pub(crate) fn set_subject(
    slot: &mut Option<String>,
    what: &str,
    value: &str,
    valid: impl FnOnce(&str) -> bool,
) {
    let value = value.trim();
    if valid(value) {
        *slot = Some(value.to_owned());
    } else {
        error!(subject = what, value, "invalid subject, ignoring");
    }
}

/// [`set_subject`] for subjects that always have a value (VRF, module).
pub(crate) fn set_value(slot: &mut String, what: &str, value: &str, valid: impl FnOnce(&str) -> bool) {
    let value = value.trim();
    if valid(value) {
        value.clone_into(slot);
    } else {
        error!(subject = what, value, "invalid subject, ignoring");
    }
}

/// Interface names as NX-OS prints them: a letter first, then anything but
/// whitespace (`Ethernet1/1`, `port-channel10`, `nve1`, `mgmt0`).
pub fn is_interface_name(x: &str) -> bool {
    let mut chars = x.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && !x.contains(char::is_whitespace)
}

/// VRF names: non-empty, no whitespace.
pub fn is_vrf_name(x: &str) -> bool {
    !x.is_empty() && !x.contains(char::is_whitespace)
}

/// IPv4 or IPv6 address family of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[default]
    Ipv4,
    Ipv6,
}

impl Family {
    pub fn from_ipv6_flag(ipv6: bool) -> Self {
        if ipv6 { Self::Ipv6 } else { Self::Ipv4 }
    }

    /// `ip` / `ipv6` as used in `show ip route` style CLIs.
    pub fn ip_keyword(self) -> &'static str {
        match self {
            Self::Ipv4 => "ip",
            Self::Ipv6 => "ipv6",
        }
    }

    /// `ipv4` / `ipv6` as used in `show bgp ipv4 ...` style CLIs.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
        }
    }

    pub fn is_address(self, x: &str) -> bool {
        match self {
            Self::Ipv4 => nxfleet_api::verify::is_ipv4(x),
            Self::Ipv6 => nxfleet_api::verify::is_ipv6(x),
        }
    }

    pub fn is_prefix(self, x: &str) -> bool {
        match self {
            Self::Ipv4 => nxfleet_api::verify::is_ipv4_prefix(x),
            Self::Ipv6 => nxfleet_api::verify::is_ipv6_prefix(x),
        }
    }

    pub fn is_mask_len(self, n: i64) -> bool {
        match self {
            Self::Ipv4 => nxfleet_api::verify::is_ipv4_mask_len(n),
            Self::Ipv6 => nxfleet_api::verify::is_ipv6_mask_len(n),
        }
    }
}
