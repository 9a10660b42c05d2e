// Routing state: VRFs, IPv6 neighbor discovery, RIB summaries.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nxfleet_api::verify;

use super::{Entity, Family, is_vrf_name, set_subject, set_value};
use crate::normalize::{
    Fields, INT_MISSING, Row, key_rows, select_row, strip_row, strip_tables, table_rows,
};

/// Body of the `TABLE_vrf` row named `vrf` as a JSON object.
fn vrf_row(body: &Value, vrf: &str) -> Option<Value> {
    let vrfs = table_rows("vrf", body);
    select_row(&vrfs, "vrf-name-out", vrf).map(|r| Value::Object(r.clone()))
}

// ── show vrf ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct Vrf {
    vrf: Option<String>,
    info: Row,
    vrfs: IndexMap<String, Row>,
}

impl Vrf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_subject(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vrfs.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.vrfs.get(self.vrf.as_deref()?)
    }

    pub fn id(&self) -> i64 {
        self.row().int_or_neg("vrf_id")
    }

    pub fn state(&self) -> String {
        self.row().str_or_na("vrf_state")
    }

    pub fn reason(&self) -> String {
        self.row().str_or_na("vrf_reason")
    }
}

impl Entity for Vrf {
    fn command(&self) -> String {
        "show vrf".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.vrfs.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.vrfs = key_rows(table_rows("vrf", body), "vrf_name");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show ipv6 neighbor [vrf <vrf>] ───────────────────────────────────

/// IPv6 ND cache of one VRF, keyed by neighbor address.
#[derive(Debug, Clone, Serialize)]
pub struct Ipv6Neighbors {
    vrf: String,
    address: Option<String>,
    info: Row,
    neighbors: IndexMap<String, Row>,
}

impl Default for Ipv6Neighbors {
    fn default() -> Self {
        Self {
            vrf: "default".to_owned(),
            address: None,
            info: Row::new(),
            neighbors: IndexMap::new(),
        }
    }
}

impl Ipv6Neighbors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn set_address(&mut self, address: &str) {
        set_subject(&mut self.address, "address", address, verify::is_ipv6);
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.neighbors.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.neighbors.get(self.address.as_deref()?)
    }

    pub fn mac(&self) -> String {
        self.row().str_or_na("mac")
    }

    pub fn interface(&self) -> String {
        self.row().str_or_na("intf-out")
    }

    pub fn physical_interface(&self) -> String {
        self.row().str_or_na("phy-intf")
    }

    /// Age of the entry in seconds.
    pub fn age_secs(&self) -> f64 {
        self.row().secs_or_neg("time-stamp")
    }
}

impl Entity for Ipv6Neighbors {
    fn command(&self) -> String {
        format!("show ipv6 neighbor vrf {}", self.vrf)
    }

    fn clear(&mut self) {
        self.info.clear();
        self.neighbors.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let Some(vrf) = vrf_row(body, &self.vrf) else {
            debug!(vrf = %self.vrf, "no ipv6 neighbor table in reply");
            return;
        };
        self.neighbors = key_rows(table_rows("adj", &vrf), "ipv6-addr")
            .into_iter()
            .map(|(k, v)| (k, strip_row(&v)))
            .collect();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show ipv6 neighbor summary vrf <vrf> ─────────────────────────────

/// ND cache counters. The counters are top-level scalars of the reply.
#[derive(Debug, Clone, Serialize)]
pub struct Ipv6NeighborSummary {
    vrf: String,
    info: Row,
}

impl Default for Ipv6NeighborSummary {
    fn default() -> Self {
        Self {
            vrf: "default".to_owned(),
            info: Row::new(),
        }
    }
}

impl Ipv6NeighborSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn static_entries(&self) -> i64 {
        self.info.int_or_neg("cnt-static")
    }

    pub fn dynamic_entries(&self) -> i64 {
        self.info.int_or_neg("cnt-dynamic")
    }

    pub fn other_entries(&self) -> i64 {
        self.info.int_or_neg("cnt-others")
    }

    pub fn throttled_entries(&self) -> i64 {
        self.info.int_or_neg("cnt-throttle")
    }

    pub fn total(&self) -> i64 {
        self.info.int_or_neg("cnt-total")
    }
}

impl Entity for Ipv6NeighborSummary {
    fn command(&self) -> String {
        format!("show ipv6 neighbor summary vrf {}", self.vrf)
    }

    fn clear(&mut self) {
        self.info.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show {ip | ipv6} route summary vrf <vrf> ─────────────────────────

/// RIB occupancy: totals, best paths per routing client, routes per mask.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    family: Family,
    vrf: String,
    info: Row,
    summary: Row,
    /// client name (`bgp-65000`, `direct`, `local`...) -> best paths
    best_paths: IndexMap<String, i64>,
    routes_per_mask: IndexMap<i64, i64>,
}

impl RouteSummary {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            vrf: "default".to_owned(),
            info: Row::new(),
            summary: Row::new(),
            best_paths: IndexMap::new(),
            routes_per_mask: IndexMap::new(),
        }
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn routes(&self) -> i64 {
        self.summary.int_or_neg("routes")
    }

    pub fn paths(&self) -> i64 {
        self.summary.int_or_neg("paths")
    }

    pub fn clients(&self) -> impl Iterator<Item = &str> {
        self.best_paths.keys().map(String::as_str)
    }

    pub fn best_paths(&self, client: &str) -> i64 {
        self.best_paths.get(client).copied().unwrap_or(INT_MISSING)
    }

    pub fn routes_per_mask(&self) -> &IndexMap<i64, i64> {
        &self.routes_per_mask
    }

    pub fn routes_for_mask(&self, mask_len: i64) -> i64 {
        if !self.family.is_mask_len(mask_len) || self.summary.is_empty() {
            return INT_MISSING;
        }
        self.routes_per_mask.get(&mask_len).copied().unwrap_or(0)
    }

    /// Sum of route counts over masks in `ge..=le`.
    pub fn routes_in_mask_range(&self, ge: i64, le: i64) -> i64 {
        if self.summary.is_empty() {
            return INT_MISSING;
        }
        self.routes_per_mask
            .iter()
            .filter(|(m, _)| (ge..=le).contains(*m))
            .map(|(_, c)| *c)
            .sum()
    }
}

impl Entity for RouteSummary {
    fn command(&self) -> String {
        format!(
            "show {} route summary vrf {}",
            self.family.ip_keyword(),
            self.vrf
        )
    }

    fn clear(&mut self) {
        self.info.clear();
        self.summary.clear();
        self.best_paths.clear();
        self.routes_per_mask.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let Some(vrf) = vrf_row(body, &self.vrf) else {
            debug!(vrf = %self.vrf, "no route summary in reply");
            return;
        };
        let Some(addrf) = table_rows("addrf", &vrf).first().map(|r| Value::Object((*r).clone()))
        else {
            return;
        };
        let Some(summary) = table_rows("summary", &addrf).first().map(|r| (*r).clone()) else {
            return;
        };
        self.summary = strip_row(&summary);
        let summary = Value::Object(summary);
        for row in table_rows("route_count", &summary) {
            if let Some(client) = row.get("clientnameuni").and_then(Value::as_str) {
                self.best_paths.insert(client.to_owned(), row.int_or_neg("best_paths"));
            }
        }
        for row in table_rows("prefix_length", &summary) {
            let mask = row.int_or_neg("mask_len");
            if !self.family.is_mask_len(mask) {
                debug!(mask, "ignoring out-of-range mask length");
                continue;
            }
            *self.routes_per_mask.entry(mask).or_insert(0) += row.int_or_neg("count").max(0);
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{assert_shape_invariant, loaded};
    use serde_json::json;

    #[test]
    fn vrf_table() {
        let body = json!({"TABLE_vrf": {"ROW_vrf": [
            {"vrf_name": "default", "vrf_id": "1", "vrf_state": "Up", "vrf_reason": "--"},
            {"vrf_name": "management", "vrf_id": "2", "vrf_state": "Up"}
        ]}});
        let mut v = loaded(Vrf::new(), &body);
        assert_eq!(v.names().collect::<Vec<_>>(), vec!["default", "management"]);
        v.set_vrf("management");
        assert_eq!(v.id(), 2);
        assert_eq!(v.reason(), "na");
    }

    fn nd_body(adj: &Value) -> Value {
        json!({"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default",
            "TABLE_adj": {"ROW_adj": adj}}}})
    }

    #[test]
    fn ipv6_neighbors() {
        let adj = json!({"ipv6-addr": "2001:db8::2", "time-stamp": "00:05:17",
            "mac": "00de.fb00.0002", "intf-out": "Vlan10", "phy-intf": "Ethernet1/1"});
        let mut n = Ipv6Neighbors::new();
        n.set_address("10.0.0.1");
        assert_eq!(n.command(), "show ipv6 neighbor vrf default");
        let mut n = loaded(n, &nd_body(&adj));
        assert_eq!(n.mac(), "na");
        n.set_address("2001:db8::2");
        assert_eq!(n.mac(), "00de.fb00.0002");
        assert!((n.age_secs() - 317.0).abs() < f64::EPSILON);
        assert_shape_invariant(Ipv6Neighbors::new, &nd_body(&adj), &nd_body(&json!([adj])));
    }

    #[test]
    fn ipv6_neighbor_summary_reads_top_level() {
        let body = json!({"cnt-static": "1", "cnt-dynamic": "20", "cnt-others": "0",
            "cnt-throttle": "0", "cnt-total": "21",
            "TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default", "cnt-total": "99"}}});
        let mut s = Ipv6NeighborSummary::new();
        s.set_vrf("tenant-a");
        assert_eq!(s.command(), "show ipv6 neighbor summary vrf tenant-a");
        let s = loaded(s, &body);
        assert_eq!(s.total(), 21);
        assert_eq!(s.dynamic_entries(), 20);
    }

    fn summary_body(prefixes: &Value) -> Value {
        json!({"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default",
            "TABLE_addrf": {"ROW_addrf": {"addrf": "ipv4",
                "TABLE_summary": {"ROW_summary": {"routes": "130", "paths": "160",
                    "TABLE_unicast": {"ROW_unicast": []},
                    "TABLE_route_count": {"ROW_route_count": [
                        {"clientnameuni": "bgp-65000", "best_paths": "100"},
                        {"clientnameuni": "direct", "best_paths": "20"}
                    ]},
                    "TABLE_prefix_length": {"ROW_prefix_length": prefixes}
                }}
            }}
        }}})
    }

    #[test]
    fn route_summary_masks() {
        let s = loaded(
            RouteSummary::new(Family::Ipv4),
            &summary_body(&json!([
                {"mask_len": "32", "count": "100"},
                {"mask_len": "24", "count": "30"}
            ])),
        );
        assert_eq!(s.routes(), 130);
        assert_eq!(s.best_paths("bgp-65000"), 100);
        assert_eq!(s.best_paths("ospf-1"), -1);
        assert_eq!(s.routes_for_mask(24), 30);
        assert_eq!(s.routes_for_mask(16), 0);
        assert_eq!(s.routes_for_mask(40), -1);
        assert_eq!(s.routes_in_mask_range(25, 32), 100);
        assert_eq!(s.command(), "show ip route summary vrf default");
    }

    #[test]
    fn route_summary_shape_invariant() {
        let p = json!({"mask_len": "64", "count": "3"});
        assert_shape_invariant(
            || RouteSummary::new(Family::Ipv6),
            &summary_body(&p),
            &summary_body(&json!([p])),
        );
        let s = RouteSummary::new(Family::Ipv6);
        assert_eq!(s.command(), "show ipv6 route summary vrf default");
        assert_eq!(s.routes_for_mask(64), -1);
    }
}
