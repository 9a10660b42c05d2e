// VXLAN: show nve peers, show nve interface nve1 detail

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use nxfleet_api::verify;

use super::{Entity, set_subject};
use crate::normalize::{Fields, Row, drift, key_rows, strip_row, strip_tables, table_rows};

// ── show nve peers ───────────────────────────────────────────────────

/// VTEP peers keyed by address. IPv4 and IPv6 peers share one key space.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NvePeers {
    peer: Option<String>,
    info: Row,
    peers: IndexMap<String, Row>,
}

impl NvePeers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_peer(&mut self, peer: &str) {
        set_subject(&mut self.peer, "peer", peer, verify::is_ip);
    }

    pub fn peers(&self) -> impl Iterator<Item = &str> {
        self.peers.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.peers.get(self.peer.as_deref()?)
    }

    pub fn state(&self) -> String {
        self.row().str_or_na("peer-state")
    }

    pub fn nve_interface(&self) -> String {
        self.row().str_or_na("nve-name")
    }

    pub fn learn_type(&self) -> String {
        self.row().str_or_na("learn-type")
    }

    pub fn router_mac(&self) -> String {
        self.row().str_or_na("router-mac")
    }

    pub fn uptime_secs(&self) -> f64 {
        self.row().secs_or_neg("uptime")
    }

    /// Peers whose state is anything but `Up`.
    pub fn down_peers(&self) -> Vec<&str> {
        self.peers
            .iter()
            .filter(|(_, r)| r.str_or_na("peer-state") != "Up")
            .map(|(p, _)| p.as_str())
            .collect()
    }
}

impl Entity for NvePeers {
    fn command(&self) -> String {
        "show nve peers".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.peers.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let rows: Vec<Row> = table_rows("nve_peers", body)
            .into_iter()
            .map(|r| {
                let mut r = strip_row(r);
                drift::apply(drift::NVE_PEER, &mut r);
                r
            })
            .collect();
        self.peers = key_rows(&rows, "peer-ip");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show nve interface nve1 detail ───────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct NveInterface {
    info: Row,
    nve: Row,
}

impl NveInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> String {
        self.nve.str_or_na("if-state")
    }

    pub fn encapsulation(&self) -> String {
        self.nve.str_or_na("encap-type")
    }

    pub fn source_interface(&self) -> String {
        self.nve.str_or_na("src-if-name")
    }

    pub fn source_interface_state(&self) -> String {
        self.nve.str_or_na("src-if-state")
    }

    pub fn primary_ip(&self) -> String {
        self.nve.str_or_na("primary-ip")
    }

    /// vPC anycast address; `na` on standalone VTEPs.
    pub fn secondary_ip(&self) -> String {
        self.nve.str_or_na("secondary-ip")
    }

    pub fn host_reachability(&self) -> String {
        self.nve.str_or_na("host-reach-mode")
    }

    pub fn router_mac(&self) -> String {
        self.nve.str_or_na("local-rmac")
    }

    pub fn vpc_capability(&self) -> String {
        self.nve.str_or_na("vpc-capability")
    }
}

impl Entity for NveInterface {
    fn command(&self) -> String {
        "show nve interface nve1 detail".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.nve.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.nve = table_rows("nve_if", body)
            .first()
            .map(|r| strip_row(r))
            .unwrap_or_default();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
