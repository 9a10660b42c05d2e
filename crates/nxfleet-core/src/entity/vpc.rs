// show vpc
// show vpc consistency-parameters {global | vni | vlans | interface <if>}

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{Entity, is_interface_name};
use crate::normalize::{
    Fields, NA, Row, key_rows, scalar_text, strip_row, strip_tables, table_rows, to_list,
};

// ── show vpc ─────────────────────────────────────────────────────────

/// vPC domain status, the peer-link, and each vPC.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vpc {
    info: Row,
    peerlink: Row,
    vpcs: IndexMap<String, Row>,
}

impl Vpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain_id(&self) -> i64 {
        self.info.int_or_neg("vpc-domain-id")
    }

    pub fn peer_status(&self) -> String {
        self.info.str_or_na("vpc-peer-status")
    }

    pub fn keepalive_status(&self) -> String {
        self.info.str_or_na("vpc-peer-keepalive-status")
    }

    pub fn role(&self) -> String {
        self.info.str_or_na("vpc-role")
    }

    pub fn peer_consistency(&self) -> String {
        self.info.str_or_na("vpc-peer-consistency")
    }

    pub fn type2_consistency(&self) -> String {
        self.info.str_or_na("vpc-type-2-consistency")
    }

    pub fn vpc_count(&self) -> i64 {
        self.info.int_or_neg("num-of-vpcs")
    }

    pub fn peerlink_interface(&self) -> String {
        self.peerlink.str_or_na("peerlink-ifindex")
    }

    pub fn peerlink_state(&self) -> String {
        self.peerlink.str_or_na("peer-link-port-state")
    }

    pub fn peerlink_vlans(&self) -> String {
        self.peerlink.str_or_na("peer-up-vlan-bitset")
    }

    pub fn vpc_ids(&self) -> impl Iterator<Item = &str> {
        self.vpcs.keys().map(String::as_str)
    }

    pub fn vpc_interface(&self, id: &str) -> String {
        self.vpcs.get(id).str_or_na("vpc-ifindex")
    }

    pub fn vpc_state(&self, id: &str) -> String {
        self.vpcs.get(id).str_or_na("vpc-port-state")
    }

    pub fn vpc_consistency(&self, id: &str) -> String {
        self.vpcs.get(id).str_or_na("vpc-consistency")
    }
}

impl Entity for Vpc {
    fn command(&self) -> String {
        "show vpc".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.peerlink.clear();
        self.vpcs.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.peerlink = table_rows("peerlink", body)
            .first()
            .map(|r| strip_row(r))
            .unwrap_or_default();
        self.vpcs = key_rows(table_rows("vpc", body), "vpc-id");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show vpc consistency-parameters ... ──────────────────────────────

/// Which parameter set a consistency check reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyKind {
    #[default]
    Global,
    Vni,
    Vlans,
    Interface(String),
}

impl ConsistencyKind {
    /// Parse a `--type` value; `interface` needs the interface name.
    pub fn parse(kind: &str, interface: Option<&str>) -> Option<Self> {
        match kind {
            "global" => Some(Self::Global),
            "vni" => Some(Self::Vni),
            "vlans" => Some(Self::Vlans),
            "interface" => interface
                .filter(|i| is_interface_name(i))
                .map(|i| Self::Interface(i.to_owned())),
            _ => None,
        }
    }

    fn keyword(&self) -> String {
        match self {
            Self::Global => "global".to_owned(),
            Self::Vni => "vni".to_owned(),
            Self::Vlans => "vlans".to_owned(),
            Self::Interface(i) => format!("interface {i}"),
        }
    }
}

/// One consistency parameter as both peers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcParam {
    pub name: String,
    pub kind: String,
    pub local: String,
    pub peer: String,
}

impl VpcParam {
    fn from_row(row: &Row) -> Self {
        Self {
            name: joined_text(row, "vpc-param-name"),
            kind: joined_text(row, "vpc-param-type"),
            local: joined_text(row, "vpc-param-local-val"),
            peer: joined_text(row, "vpc-param-peer-val"),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.local == self.peer
    }

    /// A grouped record (`"Allowed VLANs, Local suspended VLANs"`) must carry
    /// one comma-separated local value per name.
    pub fn is_mismatched(&self) -> bool {
        comma_count(&self.name) != comma_count(&self.local)
    }
}

/// Scalar text of `key`; a list is joined with `", "`, absent reads `na`.
fn joined_text(row: &Row, key: &str) -> String {
    let Some(value) = row.get(key) else {
        return NA.to_owned();
    };
    let parts: Vec<String> = to_list(value).into_iter().filter_map(scalar_text).collect();
    if parts.is_empty() {
        NA.to_owned()
    } else {
        parts.join(", ")
    }
}

fn comma_count(text: &str) -> usize {
    text.split(',').count()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VpcConsistency {
    kind: ConsistencyKind,
    info: Row,
    /// One record per row, in device order. Names may repeat.
    params: Vec<VpcParam>,
    /// VLAN id -> reason code (`vlans` only).
    vlans: IndexMap<String, String>,
}

impl VpcConsistency {
    pub fn new(kind: ConsistencyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> &ConsistencyKind {
        &self.kind
    }

    pub fn params(&self) -> &[VpcParam] {
        &self.params
    }

    fn param(&self, name: &str) -> Option<&VpcParam> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn local_value(&self, name: &str) -> String {
        self.param(name).map_or_else(|| NA.to_owned(), |p| p.local.clone())
    }

    pub fn peer_value(&self, name: &str) -> String {
        self.param(name).map_or_else(|| NA.to_owned(), |p| p.peer.clone())
    }

    /// Parameters whose local and peer values differ.
    pub fn inconsistent_params(&self) -> Vec<&VpcParam> {
        self.params.iter().filter(|p| !p.is_consistent()).collect()
    }

    /// VLANs whose reason code is anything but `SUCCESS`.
    pub fn inconsistent_vlans(&self) -> Vec<&str> {
        self.vlans
            .iter()
            .filter(|(_, reason)| reason.as_str() != "SUCCESS")
            .map(|(v, _)| v.as_str())
            .collect()
    }

    /// Names of records whose name list and local value list differ in length.
    pub fn mismatched_labels(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.is_mismatched())
            .map(|p| p.name.as_str())
            .collect()
    }
}

impl Entity for VpcConsistency {
    fn command(&self) -> String {
        format!("show vpc consistency-parameters {}", self.kind.keyword())
    }

    fn clear(&mut self) {
        self.info.clear();
        self.params.clear();
        self.vlans.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.params = table_rows("vpc_consistency", body)
            .into_iter()
            .map(VpcParam::from_row)
            .collect();
        for param in self.params.iter().filter(|p| p.is_mismatched()) {
            debug!(label = %param.name, local = %param.local, "consistency label count mismatch");
        }
        if self.kind == ConsistencyKind::Vlans {
            self.vlans = table_rows("vlan_consistency", body)
                .into_iter()
                .filter_map(|r| {
                    let vlan = r.get("vlan-id").and_then(scalar_text)?;
                    Some((vlan, r.str_or_na("reason_code")))
                })
                .collect();
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
