// show interface [<if>] [status | transceiver]

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{Entity, is_interface_name, set_subject};
use crate::normalize::{Fields, Row, key_rows, strip_row, strip_tables, table_rows};

/// Counter fields `show interface` reports per port, in display order.
pub const COUNTERS: &[&str] = &[
    "eth_inpkts",
    "eth_inbytes",
    "eth_inucast",
    "eth_inmcast",
    "eth_inbcast",
    "eth_outpkts",
    "eth_outbytes",
    "eth_outucast",
    "eth_outmcast",
    "eth_outbcast",
    "eth_inerr",
    "eth_outerr",
    "eth_crc",
    "eth_runts",
    "eth_giants",
    "eth_indiscard",
    "eth_outdiscard",
    "eth_overrun",
    "eth_underrun",
    "eth_collision",
    "eth_link_flapped_count",
    "eth_reset_cntr",
];

/// Rows of `table` keyed by `interface`, `TABLE_*` children removed.
fn interface_rows(table: &str, body: &Value) -> IndexMap<String, Row> {
    key_rows(table_rows(table, body), "interface")
        .into_iter()
        .map(|(k, v)| (k, strip_row(&v)))
        .collect()
}

// ── show interface [<if>] ────────────────────────────────────────────

/// Port state and counters. With no interface set, the refresh reads every
/// port (`show interface`); select one afterwards to read scalars.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Interface {
    interface: Option<String>,
    /// Refresh with `show interface` regardless of the selected port.
    all: bool,
    info: Row,
    interfaces: IndexMap<String, Row>,
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh every interface instead of only the selected one.
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.interfaces.get(self.interface.as_deref()?)
    }

    pub fn state(&self) -> String {
        self.row().str_or_na("state")
    }

    pub fn admin_state(&self) -> String {
        self.row().str_or_na("admin_state")
    }

    pub fn description(&self) -> String {
        self.row().str_or_na("desc")
    }

    pub fn mtu(&self) -> i64 {
        self.row().int_or_neg("eth_mtu")
    }

    /// Bandwidth in kbit/s.
    pub fn bandwidth(&self) -> i64 {
        self.row().int_or_neg("eth_bw")
    }

    pub fn speed(&self) -> String {
        self.row().str_or_na("eth_speed")
    }

    pub fn hardware(&self) -> String {
        self.row().str_or_na("eth_hw_desc")
    }

    pub fn counter(&self, name: &str) -> i64 {
        self.row().int_or_neg(name)
    }

    /// Every counter in [`COUNTERS`] for the selected interface.
    pub fn counters(&self) -> IndexMap<&'static str, i64> {
        COUNTERS.iter().map(|c| (*c, self.counter(c))).collect()
    }

    pub fn in_rate_bps(&self) -> i64 {
        self.row().int_or_neg("eth_inrate1_bits")
    }

    pub fn out_rate_bps(&self) -> i64 {
        self.row().int_or_neg("eth_outrate1_bits")
    }

    /// Seconds since the last link flap; `-1.0` when it never flapped.
    pub fn link_flapped_secs(&self) -> f64 {
        self.row().secs_or_neg("eth_link_flapped")
    }
}

impl Entity for Interface {
    fn command(&self) -> String {
        match (&self.interface, self.all) {
            (Some(i), false) => format!("show interface {i}"),
            _ => "show interface".to_owned(),
        }
    }

    fn clear(&mut self) {
        self.info.clear();
        self.interfaces.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.interfaces = interface_rows("interface", body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show interface [<if>] status ─────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceStatus {
    interface: Option<String>,
    info: Row,
    interfaces: IndexMap<String, Row>,
}

impl InterfaceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.interfaces.get(self.interface.as_deref()?)
    }

    /// Port description (`name` column).
    pub fn name(&self) -> String {
        self.row().str_or_na("name")
    }

    pub fn state(&self) -> String {
        self.row().str_or_na("state")
    }

    pub fn vlan(&self) -> String {
        self.row().str_or_na("vlan")
    }

    pub fn duplex(&self) -> String {
        self.row().str_or_na("duplex")
    }

    pub fn speed(&self) -> String {
        self.row().str_or_na("speed")
    }

    pub fn port_type(&self) -> String {
        self.row().str_or_na("type")
    }
}

impl Entity for InterfaceStatus {
    fn command(&self) -> String {
        match &self.interface {
            Some(i) => format!("show interface {i} status"),
            None => "show interface status".to_owned(),
        }
    }

    fn clear(&mut self) {
        self.info.clear();
        self.interfaces.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.interfaces = interface_rows("interface", body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show interface [<if>] transceiver ────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceTransceiver {
    interface: Option<String>,
    info: Row,
    interfaces: IndexMap<String, Row>,
}

impl InterfaceTransceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    fn row(&self) -> Option<&Row> {
        self.interfaces.get(self.interface.as_deref()?)
    }

    pub fn is_present(&self) -> bool {
        self.row().str_or_na("sfp") == "present"
    }

    pub fn vendor(&self) -> String {
        self.row().str_or_na("name")
    }

    pub fn part_number(&self) -> String {
        self.row().str_or_na("partnum")
    }

    pub fn revision(&self) -> String {
        self.row().str_or_na("rev")
    }

    pub fn serial_number(&self) -> String {
        self.row().str_or_na("serialnum")
    }

    pub fn kind(&self) -> String {
        self.row().str_or_na("type")
    }

    /// Nominal bitrate in Mbit/s.
    pub fn bitrate(&self) -> i64 {
        self.row().int_or_neg("nom_bitrate")
    }

    pub fn cisco_part_number(&self) -> String {
        self.row().str_or_na("cisco_part_number")
    }
}

impl Entity for InterfaceTransceiver {
    fn command(&self) -> String {
        match &self.interface {
            Some(i) => format!("show interface {i} transceiver"),
            None => "show interface transceiver".to_owned(),
        }
    }

    fn clear(&mut self) {
        self.info.clear();
        self.interfaces.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.interfaces = interface_rows("interface", body);
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

    fn eth() -> Value {
        json!({
            "interface": "Ethernet1/1", "state": "up", "admin_state": "up",
            "desc": "to-spine1", "eth_mtu": "9216", "eth_bw": 100_000_000,
            "eth_inpkts": 1000, "eth_outpkts": "2000", "eth_crc": "0",
            "eth_link_flapped": "1week(s) 2day(s)"
        })
    }

    #[test]
    fn single_interface() {
        let mut i = Interface::new();
        i.set_interface("Ethernet1/1");
        assert_eq!(i.command(), "show interface Ethernet1/1");
        let i = loaded(i, &json!({"TABLE_interface": {"ROW_interface": eth()}}));
        assert_eq!(i.state(), "up");
        assert_eq!(i.mtu(), 9216);
        assert_eq!(i.counter("eth_outpkts"), 2000);
        assert_eq!(i.counters()["eth_inpkts"], 1000);
        assert_eq!(i.counters()["eth_giants"], -1);
        assert!((i.link_flapped_secs() - 9.0 * 86_400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn never_flapped_is_sentinel() {
        let mut row = eth();
        row["eth_link_flapped"] = json!("never");
        let mut i = loaded(Interface::all(), &json!({"TABLE_interface": {"ROW_interface": [row]}}));
        i.set_interface("Ethernet1/1");
        assert!((i.link_flapped_secs() + 1.0).abs() < f64::EPSILON);
        assert_eq!(i.command(), "show interface");
    }

    #[test]
    fn shape_invariant() {
        assert_shape_invariant(
            Interface::all,
            &json!({"TABLE_interface": {"ROW_interface": eth()}}),
            &json!({"TABLE_interface": {"ROW_interface": [eth()]}}),
        );
    }

    #[test]
    fn status_rows() {
        let body = json!({"TABLE_interface": {"ROW_interface": [
            {"interface": "Ethernet1/1", "state": "connected", "vlan": "routed",
             "duplex": "full", "speed": "100G", "type": "QSFP-100G-CR4"},
            {"interface": "mgmt0", "state": "connected", "vlan": "routed"}
        ]}});
        let mut s = loaded(InterfaceStatus::new(), &body);
        assert_eq!(s.interfaces().count(), 2);
        s.set_interface("Ethernet1/1");
        assert_eq!(s.speed(), "100G");
        assert_eq!(s.port_type(), "QSFP-100G-CR4");
        s.set_interface("mgmt0");
        assert_eq!(s.duplex(), "na");
    }

    #[test]
    fn transceiver_rows() {
        let body = json!({"TABLE_interface": {"ROW_interface": {
            "interface": "Ethernet1/49", "sfp": "present", "type": "QSFP-100G-SR4",
            "name": "CISCO-FINISAR", "partnum": "FTLC9551REPM-C2", "serialnum": "FNS1234",
            "nom_bitrate": "25500"
        }}});
        let mut t = loaded(InterfaceTransceiver::new(), &body);
        assert!(!t.is_present());
        t.set_interface("Ethernet1/49");
        assert!(t.is_present());
        assert_eq!(t.serial_number(), "FNS1234");
        assert_eq!(t.bitrate(), 25_500);
    }
}
