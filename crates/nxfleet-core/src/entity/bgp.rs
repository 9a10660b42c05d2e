// BGP entities: neighbors, unicast/evpn summary, single prefix, process.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nxfleet_api::verify;

use super::{Entity, Family, is_vrf_name, set_subject, set_value};
use crate::normalize::{
    Fields, Row, drift, key_rows, scalar_text, select_row, strip_row, strip_tables, table_rows,
};

// ── show bgp ipv{4,6} unicast neighbors ──────────────────────────────

/// Per-peer neighbor detail.
///
/// IPv4 peers are keyed by `neighbor`, IPv6 peers by `ipv6neighbor`. The IPv6
/// entity may also hold IPv4 peers (BGP sessions over IPv4 carrying the IPv6
/// AF), so its selector accepts either family.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BgpNeighbors {
    family: Family,
    neighbor: Option<String>,
    info: Row,
    peers: IndexMap<String, Row>,
    /// Peer rows with every `TABLE_*` child removed.
    peer_global: IndexMap<String, Row>,
    /// Extended-nexthop capability rows per peer.
    capextendednhaf: IndexMap<String, Vec<Row>>,
    /// Extended-nexthop SAF rows per peer, keyed by AF name.
    capextendednhsaf: IndexMap<String, IndexMap<String, Vec<Row>>>,
}

impl BgpNeighbors {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn set_neighbor(&mut self, neighbor: &str) {
        let family = self.family;
        set_subject(&mut self.neighbor, "neighbor", neighbor, |x| match family {
            Family::Ipv4 => verify::is_ipv4(x),
            Family::Ipv6 => verify::is_ip(x),
        });
    }

    pub fn neighbor(&self) -> Option<&str> {
        self.neighbor.as_deref()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.peers.keys().map(String::as_str)
    }

    fn peer(&self) -> Option<&Row> {
        self.peer_global.get(self.neighbor.as_deref()?)
    }

    /// Raw row of the selected peer, `TABLE_*` children included.
    pub fn peer_row(&self) -> Option<&Row> {
        self.peers.get(self.neighbor.as_deref()?)
    }

    pub fn state(&self) -> String {
        self.peer().str_or_na("state")
    }

    pub fn remote_as(&self) -> String {
        self.peer().str_or_na("remoteas")
    }

    pub fn local_as(&self) -> String {
        self.peer().str_or_na("localas")
    }

    pub fn router_id(&self) -> String {
        self.peer().str_or_na("routerid")
    }

    pub fn description(&self) -> String {
        self.peer().str_or_na("description")
    }

    pub fn hold_time(&self) -> i64 {
        self.peer().int_or_neg("holdtime")
    }

    pub fn keepalive_time(&self) -> i64 {
        self.peer().int_or_neg("keepalivetime")
    }

    /// Time in the current state, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.peer().secs_or_neg("elapsedtime")
    }

    pub fn last_read_secs(&self) -> f64 {
        self.peer().secs_or_neg("lastread")
    }

    pub fn last_write_secs(&self) -> f64 {
        self.peer().secs_or_neg("lastwrite")
    }

    pub fn messages_received(&self) -> i64 {
        self.peer().int_or_neg("msgrecvd")
    }

    pub fn messages_sent(&self) -> i64 {
        self.peer().int_or_neg("msgsent")
    }

    pub fn connections_established(&self) -> i64 {
        self.peer().int_or_neg("connsestablished")
    }

    pub fn connections_dropped(&self) -> i64 {
        self.peer().int_or_neg("connsdropped")
    }

    /// AF names the selected peer negotiated extended nexthop for.
    pub fn capextendednh_af_names(&self) -> Vec<String> {
        self.neighbor
            .as_deref()
            .and_then(|n| self.capextendednhaf.get(n))
            .map(|rows| rows.iter().map(|r| r.str_or_na("capextendednh-af-name")).collect())
            .unwrap_or_default()
    }

    /// SAF names under `af_name` for the selected peer.
    pub fn capextendednh_saf_names(&self, af_name: &str) -> Vec<String> {
        self.neighbor
            .as_deref()
            .and_then(|n| self.capextendednhsaf.get(n))
            .and_then(|afs| afs.get(af_name))
            .map(|rows| rows.iter().map(|r| r.str_or_na("capextendednh-saf-name")).collect())
            .unwrap_or_default()
    }

    fn key_for(row: &Row) -> Option<String> {
        row.get("ipv6neighbor")
            .or_else(|| row.get("neighbor"))
            .and_then(scalar_text)
    }
}

impl Entity for BgpNeighbors {
    fn command(&self) -> String {
        format!("show bgp {} unicast neighbors", self.family.keyword())
    }

    fn clear(&mut self) {
        self.info.clear();
        self.peers.clear();
        self.peer_global.clear();
        self.capextendednhaf.clear();
        self.capextendednhsaf.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        for row in table_rows("neighbor", body) {
            let Some(key) = Self::key_for(row) else {
                debug!("bgp neighbor row without a neighbor key, skipped");
                continue;
            };
            let row_value = Value::Object(row.clone());

            let mut afs = Vec::new();
            let mut safs: IndexMap<String, Vec<Row>> = IndexMap::new();
            for af in table_rows("capextendednhaf", &row_value) {
                let mut af = af.clone();
                drift::apply(drift::BGP_CAP_EXTENDED_NH, &mut af);
                let af_value = Value::Object(af.clone());
                let name = af.str_or_na("capextendednh-af-name");
                let saf_rows = table_rows("capextendednhsaf", &af_value)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                safs.entry(name).or_default().extend(saf_rows);
                afs.push(strip_row(&af));
            }

            self.peer_global.insert(key.clone(), strip_row(row));
            self.capextendednhaf.insert(key.clone(), afs);
            self.capextendednhsaf.insert(key.clone(), safs);
            self.peers.insert(key, row.clone());
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show bgp {ipv4|ipv6 unicast | l2vpn evpn} summary vrf <vrf> ──────

/// Address family / subsequent AF combination a summary is read for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BgpSummaryFamily {
    #[default]
    Ipv4Unicast,
    Ipv6Unicast,
    L2vpnEvpn,
}

impl BgpSummaryFamily {
    pub fn afi(self) -> i64 {
        match self {
            Self::Ipv4Unicast => 1,
            Self::Ipv6Unicast => 2,
            Self::L2vpnEvpn => 25,
        }
    }

    pub fn safi(self) -> i64 {
        match self {
            Self::Ipv4Unicast | Self::Ipv6Unicast => 1,
            Self::L2vpnEvpn => 70,
        }
    }

    fn cli(self) -> &'static str {
        match self {
            Self::Ipv4Unicast => "ipv4 unicast",
            Self::Ipv6Unicast => "ipv6 unicast",
            Self::L2vpnEvpn => "l2vpn evpn",
        }
    }
}

/// Peer table from `show bgp ... summary`, keyed by `neighborid`.
#[derive(Debug, Clone, Serialize)]
pub struct BgpSummary {
    family: BgpSummaryFamily,
    vrf: String,
    neighbor: Option<String>,
    info: Row,
    vrf_info: Row,
    af_info: Row,
    peers: IndexMap<String, Row>,
}

impl BgpSummary {
    pub fn new(family: BgpSummaryFamily) -> Self {
        Self {
            family,
            vrf: "default".to_owned(),
            neighbor: None,
            info: Row::new(),
            vrf_info: Row::new(),
            af_info: Row::new(),
            peers: IndexMap::new(),
        }
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn set_neighbor(&mut self, neighbor: &str) {
        set_subject(&mut self.neighbor, "neighbor", neighbor, verify::is_ip);
    }

    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        self.peers.keys().map(String::as_str)
    }

    pub fn neighbor_count(&self) -> usize {
        self.peers.len()
    }

    fn peer(&self) -> Option<&Row> {
        self.peers.get(self.neighbor.as_deref()?)
    }

    pub fn router_id(&self) -> String {
        self.vrf_info.str_or_na("vrf-router-id")
    }

    pub fn local_as(&self) -> String {
        self.vrf_info.str_or_na("vrf-local-as")
    }

    pub fn table_version(&self) -> i64 {
        self.af_info.int_or_neg("tableversion")
    }

    pub fn state(&self) -> String {
        self.peer().str_or_na("state")
    }

    pub fn remote_as(&self) -> String {
        self.peer().str_or_na("neighboras")
    }

    pub fn prefixes_received(&self) -> i64 {
        self.peer().int_or_neg("prefixreceived")
    }

    pub fn messages_received(&self) -> i64 {
        self.peer().int_or_neg("msgrecvd")
    }

    pub fn messages_sent(&self) -> i64 {
        self.peer().int_or_neg("msgsent")
    }

    /// Time in the current state, in seconds.
    pub fn up_time_secs(&self) -> f64 {
        self.peer().secs_or_neg("time")
    }
}

impl Entity for BgpSummary {
    fn command(&self) -> String {
        format!("show bgp {} summary vrf {}", self.family.cli(), self.vrf)
    }

    fn clear(&mut self) {
        self.info.clear();
        self.vrf_info.clear();
        self.af_info.clear();
        self.peers.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let vrfs = table_rows("vrf", body);
        let Some(vrf) = select_row(&vrfs, "vrf-name-out", &self.vrf) else {
            debug!(vrf = %self.vrf, "no TABLE_vrf in bgp summary");
            return;
        };
        self.vrf_info = strip_row(vrf);

        let vrf = Value::Object(vrf.clone());
        let afi = self.family.afi();
        let safi = self.family.safi();
        let Some(af) = table_rows("af", &vrf)
            .into_iter()
            .find(|r| r.int_or_neg("af-id") == afi)
        else {
            debug!(afi, "address family not present in bgp summary");
            return;
        };
        let af = Value::Object(af.clone());
        let Some(saf) = table_rows("saf", &af)
            .into_iter()
            .find(|r| r.int_or_neg("safi") == safi)
        else {
            debug!(safi, "subsequent address family not present in bgp summary");
            return;
        };
        self.af_info = strip_row(saf);
        let saf = Value::Object(saf.clone());
        self.peers = key_rows(table_rows("neighbor", &saf), "neighborid");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show bgp ipv4 unicast <prefix> ────────────────────────────────────

/// Paths for one IPv4 prefix.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BgpPrefix {
    prefix: Option<String>,
    info: Row,
    prefix_info: Row,
    paths: Vec<Row>,
}

impl BgpPrefix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        set_subject(&mut self.prefix, "prefix", prefix, verify::is_ipv4_prefix);
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn paths(&self) -> &[Row] {
        &self.paths
    }

    pub fn path_count(&self) -> i64 {
        if self.prefix_info.is_empty() {
            return crate::normalize::INT_MISSING;
        }
        self.prefix_info
            .get("totalpaths")
            .map_or_else(
                || i64::try_from(self.paths.len()).unwrap_or(i64::MAX),
                |_| self.prefix_info.int_or_neg("totalpaths"),
            )
    }

    pub fn best_path_number(&self) -> i64 {
        self.prefix_info.int_or_neg("bestpathnr")
    }

    pub fn prefix_version(&self) -> i64 {
        self.prefix_info.int_or_neg("prefixversion")
    }

    fn best_path(&self) -> Option<&Row> {
        self.paths.iter().find(|p| p.bool_or_false("best"))
    }

    pub fn best_next_hop(&self) -> String {
        self.best_path().str_or_na("ipnexthop")
    }

    pub fn best_as_path(&self) -> String {
        self.best_path().str_or_na("aspath")
    }

    pub fn best_local_pref(&self) -> i64 {
        self.best_path().int_or_neg("localpref")
    }

    pub fn next_hops(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.str_or_na("ipnexthop")).collect()
    }
}

impl Entity for BgpPrefix {
    fn command(&self) -> String {
        match &self.prefix {
            Some(p) => format!("show bgp ipv4 unicast {p}"),
            None => "show bgp ipv4 unicast".to_owned(),
        }
    }

    fn clear(&mut self) {
        self.info.clear();
        self.prefix_info.clear();
        self.paths.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        // vrf -> afi -> safi -> rd -> prefix -> path
        let mut level = body.clone();
        for table in ["vrf", "afi", "safi", "rd"] {
            let Some(row) = table_rows(table, &level).first().map(|r| Value::Object((*r).clone()))
            else {
                debug!(table, "bgp prefix walk ended early");
                return;
            };
            level = row;
        }
        let prefixes = table_rows("prefix", &level);
        let want = self.prefix.as_deref().unwrap_or_default();
        let Some(prefix) = select_row(&prefixes, "ipprefix", want) else {
            return;
        };
        self.prefix_info = strip_row(prefix);
        let prefix = Value::Object(prefix.clone());
        self.paths = table_rows("path", &prefix)
            .into_iter()
            .map(strip_row)
            .collect();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show bgp process ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct BgpProcess {
    vrf: Option<String>,
    info: Row,
    vrfs: IndexMap<String, Row>,
}

impl BgpProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_subject(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn process_id(&self) -> i64 {
        self.info.int_or_neg("bgp-pid")
    }

    pub fn asn(&self) -> String {
        self.info.str_or_na("bgp-tag")
    }

    pub fn protocol_state(&self) -> String {
        self.info.str_or_na("bgp-protocol-state")
    }

    pub fn memory_state(&self) -> String {
        self.info.str_or_na("bgp-memory-state")
    }

    pub fn vrf_names(&self) -> impl Iterator<Item = &str> {
        self.vrfs.keys().map(String::as_str)
    }

    fn vrf_row(&self) -> Option<&Row> {
        self.vrfs.get(self.vrf.as_deref()?)
    }

    pub fn vrf_router_id(&self) -> String {
        self.vrf_row().str_or_na("vrf-router-id")
    }

    pub fn vrf_state(&self) -> String {
        self.vrf_row().str_or_na("vrf-state")
    }

    pub fn vrf_peers(&self) -> i64 {
        self.vrf_row().int_or_neg("vrf-peers")
    }

    pub fn vrf_established_peers(&self) -> i64 {
        self.vrf_row().int_or_neg("vrf-num-estb-peers")
    }
}

impl Entity for BgpProcess {
    fn command(&self) -> String {
        "show bgp process".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.vrfs.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.vrfs = key_rows(table_rows("vrf", body), "vrf-name-out")
            .into_iter()
            .map(|(k, v)| (k, strip_row(&v)))
            .collect();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::testing::{assert_shape_invariant, loaded};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v6_neighbors() -> Value {
        json!({"TABLE_neighbor": {"ROW_neighbor": [
            {
                "ipv6neighbor": "2001:db8::2", "remoteas": "65001", "state": "Established",
                "elapsedtime": "1w2d", "holdtime": "180", "lastread": "00:00:21",
                "TABLE_capextendednhaf": {"ROW_capextendednhaf": {
                    "capextendednh-afi": "2", "capextendednh-af-name": "IPv6Unicast",
                    "TABLE_capextendednhsaf": {"ROW_capextendednhsaf": {
                        "capextendednh-safi": "1", "capextendednh-saf-name": "Unicast"
                    }}
                }}
            },
            {"neighbor": "10.0.0.9", "remoteas": "65002", "state": "Idle"}
        ]}})
    }

    #[test]
    fn ipv6_neighbors_are_keyed_by_either_family() {
        let mut bgp = loaded(BgpNeighbors::new(Family::Ipv6), &v6_neighbors());
        assert_eq!(bgp.neighbors().collect::<Vec<_>>(), vec!["2001:db8::2", "10.0.0.9"]);

        bgp.set_neighbor("2001:db8::2");
        assert_eq!(bgp.state(), "Established");
        assert_eq!(bgp.remote_as(), "65001");
        assert_eq!(bgp.hold_time(), 180);
        assert!((bgp.elapsed_secs() - 9.0 * 86_400.0).abs() < f64::EPSILON);
        assert!((bgp.last_read_secs() - 21.0).abs() < f64::EPSILON);
        assert_eq!(bgp.capextendednh_af_names(), vec!["IPv6 Unicast"]);
        assert_eq!(bgp.capextendednh_saf_names("IPv6 Unicast"), vec!["Unicast"]);
        assert!(!bgp.peer().unwrap().contains_key("TABLE_capextendednhaf"));

        bgp.set_neighbor("10.0.0.9");
        assert_eq!(bgp.state(), "Idle");
    }

    #[test]
    fn invalid_selector_keeps_previous_peer() {
        let mut bgp = loaded(BgpNeighbors::new(Family::Ipv6), &v6_neighbors());
        bgp.set_neighbor("2001:db8::2");
        bgp.set_neighbor("not-a-peer");
        assert_eq!(bgp.neighbor(), Some("2001:db8::2"));
        assert_eq!(bgp.state(), "Established");

        let mut v4 = BgpNeighbors::new(Family::Ipv4);
        v4.set_neighbor("2001:db8::2");
        assert_eq!(v4.neighbor(), None);
        assert_eq!(v4.state(), "na");
    }

    #[test]
    fn capextendednh_address_in_af_name_slot() {
        let body = json!({"TABLE_neighbor": {"ROW_neighbor": {
            "ipv6neighbor": "2001:db8::2", "state": "Established",
            "TABLE_capextendednhaf": {"ROW_capextendednhaf": {
                "capextendednh-af-name": "2001:db8::1"
            }}
        }}});
        let mut bgp = loaded(BgpNeighbors::new(Family::Ipv6), &body);
        bgp.set_neighbor("2001:db8::2");
        assert_eq!(bgp.capextendednh_af_names(), vec!["IPv6 Unicast"]);
    }

    #[test]
    fn unknown_peer_reads_sentinels() {
        let mut bgp = loaded(BgpNeighbors::new(Family::Ipv4), &v6_neighbors());
        bgp.set_neighbor("192.0.2.1");
        assert_eq!(bgp.state(), "na");
        assert_eq!(bgp.hold_time(), -1);
        assert!((bgp.elapsed_secs() + 1.0).abs() < f64::EPSILON);
    }

    fn summary_body(neighbors: &Value) -> Value {
        json!({"TABLE_vrf": {"ROW_vrf": {
            "vrf-name-out": "default", "vrf-router-id": "10.0.0.1", "vrf-local-as": "65000",
            "TABLE_af": {"ROW_af": [
                {"af-id": "1", "TABLE_saf": {"ROW_saf": {
                    "safi": "1", "tableversion": "42", "TABLE_neighbor": {"ROW_neighbor": neighbors}
                }}},
                {"af-id": "25", "TABLE_saf": {"ROW_saf": {"safi": "70", "TABLE_neighbor": {
                    "ROW_neighbor": {"neighborid": "10.9.9.9", "state": "Established"}
                }}}}
            ]}
        }}})
    }

    #[test]
    fn summary_selects_af_and_safi() {
        let peer = json!({
            "neighborid": "10.0.0.2", "neighboras": "65001", "state": "Established",
            "prefixreceived": "12", "time": "2d03h"
        });
        let mut s = loaded(BgpSummary::new(BgpSummaryFamily::Ipv4Unicast), &summary_body(&peer));
        assert_eq!(s.router_id(), "10.0.0.1");
        assert_eq!(s.table_version(), 42);
        s.set_neighbor("10.0.0.2");
        assert_eq!(s.prefixes_received(), 12);
        assert!((s.up_time_secs() - (2.0 * 86_400.0 + 3.0 * 3600.0)).abs() < f64::EPSILON);

        let evpn = loaded(BgpSummary::new(BgpSummaryFamily::L2vpnEvpn), &summary_body(&peer));
        assert_eq!(evpn.neighbors().collect::<Vec<_>>(), vec!["10.9.9.9"]);
        assert_eq!(evpn.command(), "show bgp l2vpn evpn summary vrf default");

        assert_shape_invariant(
            || BgpSummary::new(BgpSummaryFamily::Ipv4Unicast),
            &summary_body(&peer),
            &summary_body(&json!([peer])),
        );
    }

    #[test]
    fn summary_missing_af_is_empty() {
        let s = loaded(
            BgpSummary::new(BgpSummaryFamily::Ipv6Unicast),
            &summary_body(&json!([])),
        );
        assert_eq!(s.neighbor_count(), 0);
        assert_eq!(s.table_version(), -1);
    }

    #[test]
    fn summary_other_vrf_reads_sentinels() {
        let peer = json!({"neighborid": "10.0.0.2", "state": "Established"});
        let mut s = BgpSummary::new(BgpSummaryFamily::Ipv4Unicast);
        s.set_vrf("tenant-a");
        let s = loaded(s, &summary_body(&peer));
        assert_eq!(s.router_id(), "na");
        assert_eq!(s.neighbors().count(), 0);
    }

    #[test]
    fn prefix_walk() {
        let body = json!({"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default",
            "TABLE_afi": {"ROW_afi": {"afi": "1",
                "TABLE_safi": {"ROW_safi": {"safi": "1",
                    "TABLE_rd": {"ROW_rd": {
                        "TABLE_prefix": {"ROW_prefix": {
                            "ipprefix": "10.1.0.0/16", "prefixversion": "7", "totalpaths": "2",
                            "bestpathnr": "1",
                            "TABLE_path": {"ROW_path": [
                                {"pathnr": "0", "best": "true", "ipnexthop": "10.0.0.2",
                                 "aspath": "65001", "localpref": "100"},
                                {"pathnr": "1", "best": "false", "ipnexthop": "10.0.0.3"}
                            ]}
                        }}
                    }}
                }}
            }}
        }}});
        let mut p = BgpPrefix::new();
        p.set_prefix("10.1.0.0/16");
        let p = loaded(p, &body);
        assert_eq!(p.path_count(), 2);
        assert_eq!(p.best_next_hop(), "10.0.0.2");
        assert_eq!(p.best_local_pref(), 100);
        assert_eq!(p.next_hops(), vec!["10.0.0.2", "10.0.0.3"]);
        assert_eq!(p.command(), "show bgp ipv4 unicast 10.1.0.0/16");
    }

    #[test]
    fn prefix_rejects_non_prefix() {
        let mut p = BgpPrefix::new();
        p.set_prefix("10.1.0.0");
        assert_eq!(p.prefix(), None);
        assert_eq!(p.path_count(), -1);
        assert_eq!(p.best_next_hop(), "na");
    }

    #[test]
    fn process_vrfs() {
        let body = json!({
            "bgp-pid": "1234", "bgp-tag": "65000", "bgp-protocol-state": "Running",
            "TABLE_vrf": {"ROW_vrf": [
                {"vrf-name-out": "default", "vrf-router-id": "10.0.0.1", "vrf-peers": "4",
                 "vrf-num-estb-peers": "3", "TABLE_af": {"ROW_af": []}},
                {"vrf-name-out": "tenant", "vrf-router-id": "10.0.1.1"}
            ]}
        });
        let mut p = loaded(BgpProcess::new(), &body);
        assert_eq!(p.process_id(), 1234);
        assert_eq!(p.asn(), "65000");
        assert_eq!(p.vrf_names().collect::<Vec<_>>(), vec!["default", "tenant"]);
        assert_eq!(p.vrf_router_id(), "na");
        p.set_vrf("default");
        assert_eq!(p.vrf_established_peers(), 3);
        assert!(!p.info().contains_key("TABLE_vrf"));
    }
}
