// ── Schema-drift registry ──
//
// Release-specific differences in NX-OS JSON, each expressed as a predicate
// plus an idempotent transform over one row. Entities run the fixup list for
// their CLI once per refresh, before reading anything.

use nxfleet_api::verify;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{Row, scalar_text};

/// One drift correction.
pub struct Fixup {
    pub name: &'static str,
    pub applies: fn(&Row) -> bool,
    pub apply: fn(&mut Row),
}

/// Run every applicable fixup over `row`, in order.
pub fn apply(fixups: &[Fixup], row: &mut Row) {
    for fixup in fixups {
        if (fixup.applies)(row) {
            debug!(fixup = fixup.name, "applying schema-drift fixup");
            (fixup.apply)(row);
        }
    }
}

// ── Aliases ──────────────────────────────────────────────────────────

fn alias(row: &mut Row, from: &str, to: &str) {
    if let Some(v) = row.remove(from) {
        row.entry(to.to_owned()).or_insert(v);
    }
}

/// BFD `show ... neighbors detail` misspells the detect timer on some trains.
pub const BFD_NEIGHBOR: &[Fixup] = &[Fixup {
    name: "bfd-dectect-timer",
    applies: |r| r.contains_key("dectect_timer"),
    apply: |r| alias(r, "dectect_timer", "detect_timer"),
}];

/// NVE peers report IPv6 VTEPs under `peer-ipv6` instead of `peer-ip`.
pub const NVE_PEER: &[Fixup] = &[Fixup {
    name: "nve-peer-ipv6",
    applies: |r| !r.contains_key("peer-ip") && r.contains_key("peer-ipv6"),
    apply: |r| {
        if let Some(v) = r.get("peer-ipv6").cloned() {
            r.insert("peer-ip".to_owned(), v);
        }
    },
}];

/// Canonical AF name for the IPv6 extended-nexthop capability.
pub const IPV6_UNICAST: &str = "IPv6 Unicast";

/// Some releases put an IPv6 address, or an IPv6-flavoured token such as
/// `IPv6Unicast`, in the extended-nexthop AF name slot. Project it onto one
/// spelling.
pub const BGP_CAP_EXTENDED_NH: &[Fixup] = &[Fixup {
    name: "bgp-capextendednh-af-name",
    applies: |r| {
        r.get("capextendednh-af-name")
            .and_then(Value::as_str)
            .is_some_and(|s| {
                s != IPV6_UNICAST
                    && (verify::is_ipv6(s) || s.to_ascii_lowercase().contains("ipv6"))
            })
    },
    apply: |r| {
        r.insert("capextendednh-af-name".to_owned(), json!(IPV6_UNICAST));
    },
}];

// ── Supervisor fields ────────────────────────────────────────────────

/// `show boot` fields that are one value per supervisor.
pub const SUPERVISOR_FIELDS: &[&str] = &["sup_number", "nxos_image", "poap_status"];

fn is_sup_pair(v: &Value) -> bool {
    matches!(v, Value::Array(items) if items.len() == 2)
}

/// Single-sup chassis print a scalar, dual-sup chassis a list. Coerce to a
/// two-element list padded with `false`.
pub const BOOT: &[Fixup] = &[Fixup {
    name: "boot-supervisor-pair",
    applies: |r| {
        SUPERVISOR_FIELDS
            .iter()
            .any(|k| r.get(*k).is_some_and(|v| !is_sup_pair(v)))
    },
    apply: |r| {
        for key in SUPERVISOR_FIELDS {
            let Some(value) = r.get_mut(*key) else {
                continue;
            };
            let mut items = match value.take() {
                Value::Array(items) => items,
                scalar => vec![scalar],
            };
            items.resize(2, Value::Bool(false));
            *value = Value::Array(items);
        }
    },
}];

// ── MAC address-table count ──────────────────────────────────────────

fn sum_counts(r: &Row) -> i64 {
    r.iter()
        .filter(|(k, _)| k.ends_with("_cnt") && k.as_str() != "total_cnt")
        .filter_map(|(_, v)| scalar_text(v)?.trim().parse::<i64>().ok())
        .sum()
}

/// Pre-I7 releases omit `rvtep_static_cnt` and `total_cnt`.
pub const MAC_COUNT: &[Fixup] = &[
    Fixup {
        name: "mac-rvtep-static-backfill",
        applies: |r| !r.contains_key("rvtep_static_cnt"),
        apply: |r| {
            r.insert("rvtep_static_cnt".to_owned(), json!(0));
        },
    },
    Fixup {
        name: "mac-total-synthesis",
        applies: |r| !r.contains_key("total_cnt"),
        apply: |r| {
            let total = sum_counts(r);
            warn!(total, "mac address-table reply has no total_cnt; synthesized from counts");
            r.insert("total_cnt".to_owned(), json!(total));
        },
    },
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(v: Value) -> Row {
        v.as_object().unwrap().clone()
    }

    fn twice(fixups: &[Fixup], r: &mut Row) -> Row {
        apply(fixups, r);
        let once = r.clone();
        apply(fixups, r);
        assert_eq!(&once, r, "fixups must be idempotent");
        once
    }

    #[test]
    fn bfd_alias() {
        let mut r = row(json!({"dectect_timer": "900", "local_disc": "1090519041"}));
        let out = twice(BFD_NEIGHBOR, &mut r);
        assert_eq!(out.get("detect_timer"), Some(&json!("900")));
        assert!(!out.contains_key("dectect_timer"));
    }

    #[test]
    fn bfd_alias_keeps_canonical_value() {
        let mut r = row(json!({"dectect_timer": "1", "detect_timer": "2"}));
        apply(BFD_NEIGHBOR, &mut r);
        assert_eq!(r.get("detect_timer"), Some(&json!("2")));
    }

    #[test]
    fn nve_peer_ipv6() {
        let mut r = row(json!({"peer-ipv6": "2001:db8::5", "peer-state": "Up"}));
        let out = twice(NVE_PEER, &mut r);
        assert_eq!(out.get("peer-ip"), Some(&json!("2001:db8::5")));
    }

    #[test]
    fn capextendednh_name() {
        let mut r = row(json!({"capextendednh-af-name": "IPv6Unicast"}));
        let out = twice(BGP_CAP_EXTENDED_NH, &mut r);
        assert_eq!(out.get("capextendednh-af-name"), Some(&json!("IPv6 Unicast")));

        let mut addr = row(json!({"capextendednh-af-name": "2001:db8::1"}));
        let out = twice(BGP_CAP_EXTENDED_NH, &mut addr);
        assert_eq!(out.get("capextendednh-af-name"), Some(&json!("IPv6 Unicast")));

        let mut v4 = row(json!({"capextendednh-af-name": "IPv4 Unicast"}));
        apply(BGP_CAP_EXTENDED_NH, &mut v4);
        assert_eq!(v4.get("capextendednh-af-name"), Some(&json!("IPv4 Unicast")));
    }

    #[test]
    fn supervisor_pair() {
        let mut single = row(json!({"sup_number": "sup-1", "nxos_image": "bootflash:/nxos.bin"}));
        let out = twice(BOOT, &mut single);
        assert_eq!(out.get("sup_number"), Some(&json!(["sup-1", false])));
        assert_eq!(out.get("nxos_image"), Some(&json!(["bootflash:/nxos.bin", false])));
        assert!(!out.contains_key("poap_status"));

        let mut dual = row(json!({"sup_number": ["sup-1", "sup-2"]}));
        let out = twice(BOOT, &mut dual);
        assert_eq!(out.get("sup_number"), Some(&json!(["sup-1", "sup-2"])));
    }

    #[test]
    fn mac_count_pre_i7() {
        let mut r = row(json!({
            "dyn_cnt": "10", "otv_cnt": "0", "static_cnt": "2", "secure_cnt": "1", "ovl_cnt": "3"
        }));
        let out = twice(MAC_COUNT, &mut r);
        assert_eq!(out.get("rvtep_static_cnt"), Some(&json!(0)));
        assert_eq!(out.get("total_cnt"), Some(&json!(16)));
    }

    #[test]
    fn mac_count_current_release_untouched() {
        let mut r = row(json!({"dyn_cnt": "1", "rvtep_static_cnt": "0", "total_cnt": "99"}));
        apply(MAC_COUNT, &mut r);
        assert_eq!(r.get("total_cnt"), Some(&json!("99")));
    }
}
