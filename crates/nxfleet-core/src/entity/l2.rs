// Layer 2: LLDP neighbors, MAC address-table counts, VLANs.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nxfleet_api::verify;

use super::{Entity, is_interface_name, set_subject};
use crate::normalize::{
    Fields, Row, drift, get_table_row_sep, key_rows, strip_row, strip_tables, table_rows,
};

// ── show lldp neighbors ──────────────────────────────────────────────

/// LLDP neighbors keyed by local port.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LldpNeighbors {
    interface: Option<String>,
    info: Row,
    neighbors: IndexMap<String, Row>,
}

impl LldpNeighbors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn local_ports(&self) -> impl Iterator<Item = &str> {
        self.neighbors.keys().map(String::as_str)
    }

    fn neighbor(&self) -> Option<&Row> {
        self.neighbors.get(self.interface.as_deref()?)
    }

    pub fn chassis_id(&self) -> String {
        self.neighbor().str_or_na("chassis_id")
    }

    pub fn port_id(&self) -> String {
        self.neighbor().str_or_na("port_id")
    }

    pub fn system_name(&self) -> String {
        self.neighbor().str_or_na("sys_name")
    }

    pub fn capability(&self) -> String {
        self.neighbor().str_or_na("capability")
    }

    pub fn hold_time(&self) -> i64 {
        self.neighbor().int_or_neg("hold_time")
    }

    pub fn neighbor_count(&self) -> i64 {
        self.info.int_or_neg("neigh_count")
    }
}

impl Entity for LldpNeighbors {
    fn command(&self) -> String {
        "show lldp neighbors".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.neighbors.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.neighbors = key_rows(table_rows("nbor", body), "l_port_id");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show mac address-table count [vlan <vlan>] ───────────────────────

/// MAC address-table entry counts, optionally for one VLAN.
///
/// This CLI spells its wrappers with hyphens (`TABLE-macaddtblcount`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct MacCount {
    vlan: Option<String>,
    info: Row,
    counts: Row,
}

impl MacCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vlan(&mut self, vlan: &str) {
        set_subject(&mut self.vlan, "vlan", vlan, verify::is_vlan);
    }

    pub fn vlan(&self) -> Option<&str> {
        self.vlan.as_deref()
    }

    pub fn counts(&self) -> &Row {
        &self.counts
    }

    pub fn dynamic(&self) -> i64 {
        self.counts.int_or_neg("dyn_cnt")
    }

    pub fn static_(&self) -> i64 {
        self.counts.int_or_neg("static_cnt")
    }

    pub fn secure(&self) -> i64 {
        self.counts.int_or_neg("secure_cnt")
    }

    pub fn overlay(&self) -> i64 {
        self.counts.int_or_neg("ovl_cnt")
    }

    pub fn otv(&self) -> i64 {
        self.counts.int_or_neg("otv_cnt")
    }

    pub fn rvtep_static(&self) -> i64 {
        self.counts.int_or_neg("rvtep_static_cnt")
    }

    pub fn total(&self) -> i64 {
        self.counts.int_or_neg("total_cnt")
    }
}

impl Entity for MacCount {
    fn command(&self) -> String {
        match &self.vlan {
            Some(v) => format!("show mac address-table count vlan {v}"),
            None => "show mac address-table count".to_owned(),
        }
    }

    fn clear(&mut self) {
        self.info.clear();
        self.counts.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        // Pre-I7 releases put the counters straight under the TABLE- key.
        let row = match get_table_row_sep("macaddtblcount", body, '-') {
            Some(rows) => rows.first().and_then(|r| r.as_object()),
            None => body.get("TABLE-macaddtblcount").and_then(Value::as_object),
        };
        let Some(row) = row else {
            debug!("no mac address-table count in reply");
            return;
        };
        let mut row = strip_row(row);
        drift::apply(drift::MAC_COUNT, &mut row);
        self.counts = row;
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show vlan id <vlan> ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct Vlan {
    vlan: Option<String>,
    info: Row,
    brief: Row,
    mtu: Row,
}

impl Vlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vlan(&mut self, vlan: &str) {
        set_subject(&mut self.vlan, "vlan", vlan, verify::is_vlan);
    }

    pub fn name(&self) -> String {
        self.brief.str_or_na("vlanshowbr-vlanname")
    }

    pub fn state(&self) -> String {
        self.brief.str_or_na("vlanshowbr-vlanstate")
    }

    pub fn shutdown_state(&self) -> String {
        self.brief.str_or_na("vlanshowbr-shutstate")
    }

    /// Member ports, as the comma-separated list NX-OS prints.
    pub fn ports(&self) -> String {
        self.brief.str_or_na("vlanshowplist-ifidx")
    }

    pub fn mode(&self) -> String {
        self.mtu.str_or_na("vlanshowinfo-vlanmode")
    }

    pub fn mtu(&self) -> i64 {
        self.mtu.int_or_neg("vlanshowinfo-mtu")
    }
}

impl Entity for Vlan {
    fn command(&self) -> String {
        let vlan = self.vlan.as_deref().unwrap_or_default();
        format!("show vlan id {vlan}")
    }

    fn clear(&mut self) {
        self.info.clear();
        self.brief.clear();
        self.mtu.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.brief = table_rows("vlanbriefid", body)
            .first()
            .map(|r| strip_row(r))
            .unwrap_or_default();
        self.mtu = table_rows("mtuinfoid", body)
            .first()
            .map(|r| strip_row(r))
            .unwrap_or_default();
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
    fn lldp_by_local_port() {
        let body = json!({"neigh_count": "2", "TABLE_nbor": {"ROW_nbor": [
            {"chassis_id": "00de.fb00.0001", "l_port_id": "Eth1/49", "hold_time": "120",
             "capability": "BR", "port_id": "Ethernet1/1", "sys_name": "spine1"},
            {"chassis_id": "00de.fb00.0002", "l_port_id": "mgmt0", "port_id": "Gi0/1"}
        ]}});
        let mut l = loaded(LldpNeighbors::new(), &body);
        assert_eq!(l.system_name(), "na");
        l.set_interface("Eth1/49");
        assert_eq!(l.system_name(), "spine1");
        assert_eq!(l.hold_time(), 120);
        assert_eq!(l.neighbor_count(), 2);
        l.set_interface("mgmt0");
        assert_eq!(l.capability(), "na");
    }

    #[test]
    fn lldp_shape_invariant() {
        let row = json!({"l_port_id": "Eth1/49", "sys_name": "spine1"});
        assert_shape_invariant(
            LldpNeighbors::new,
            &json!({"TABLE_nbor": {"ROW_nbor": row}}),
            &json!({"TABLE_nbor": {"ROW_nbor": [row]}}),
        );
    }

    #[test]
    fn mac_count_pre_i7_synthesizes_total() {
        let body = json!({"TABLE-macaddtblcount": {"ROW-macaddtblcount": {
            "dyn_cnt": "10", "otv_cnt": "0", "static_cnt": "2", "secure_cnt": "1", "ovl_cnt": "3"
        }}});
        let mut m = MacCount::new();
        m.set_vlan("10");
        assert_eq!(m.command(), "show mac address-table count vlan 10");
        let m = loaded(m, &body);
        assert_eq!(m.rvtep_static(), 0);
        assert_eq!(m.total(), 16);
        assert_eq!(m.dynamic(), 10);
    }

    #[test]
    fn mac_count_without_row_wrapper() {
        let body = json!({"TABLE-macaddtblcount": {
            "dyn_cnt": "43604", "otv_cnt": "0", "static_cnt": "0", "secure_cnt": "0"
        }});
        let m = loaded(MacCount::new(), &body);
        assert_eq!(m.total(), 43604);
        assert_eq!(m.dynamic(), 43604);
        assert_eq!(m.otv(), 0);
        assert_eq!(m.static_(), 0);
        assert_eq!(m.secure(), 0);
        assert_eq!(m.rvtep_static(), 0);
        assert_eq!(m.counts().len(), 6);
    }

    #[test]
    fn mac_count_reported_total_wins() {
        let body = json!({"TABLE-macaddtblcount": {"ROW-macaddtblcount": [{
            "dyn_cnt": "10", "static_cnt": "2", "rvtep_static_cnt": "4", "total_cnt": "20"
        }]}});
        let m = loaded(MacCount::new(), &body);
        assert_eq!(m.total(), 20);
        assert_eq!(m.rvtep_static(), 4);
    }

    #[test]
    fn mac_count_sentinels_and_vlan_gate() {
        let mut m = MacCount::new();
        m.set_vlan("4095");
        assert_eq!(m.vlan(), None);
        assert_eq!(m.total(), -1);
        let m = loaded(m, &json!({}));
        assert_eq!(m.total(), -1);
    }

    #[test]
    fn vlan_tables() {
        let body = json!({
            "TABLE_vlanbriefid": {"ROW_vlanbriefid": {"vlanshowbr-vlanid": "10",
                "vlanshowbr-vlanname": "servers", "vlanshowbr-vlanstate": "active",
                "vlanshowbr-shutstate": "noshutdown", "vlanshowplist-ifidx": "Ethernet1/1,Po11"}},
            "TABLE_mtuinfoid": {"ROW_mtuinfoid": {"vlanshowinfo-vlanid": "10",
                "vlanshowinfo-media-type": "enet", "vlanshowinfo-vlanmode": "ce-vlan",
                "vlanshowinfo-mtu": "1500"}}
        });
        let mut v = Vlan::new();
        v.set_vlan("10");
        assert_eq!(v.command(), "show vlan id 10");
        let v = loaded(v, &body);
        assert_eq!(v.name(), "servers");
        assert_eq!(v.ports(), "Ethernet1/1,Po11");
        assert_eq!(v.mtu(), 1500);
        assert_eq!(v.mode(), "ce-vlan");
    }
}
