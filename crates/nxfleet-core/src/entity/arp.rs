// show ip arp summary vrf <vrf>

use serde::Serialize;
use serde_json::Value;

use super::{Entity, is_vrf_name, set_value};
use crate::normalize::{Fields, Row, select_row, strip_row, strip_tables, table_rows};

/// ARP cache counters for one VRF.
#[derive(Debug, Clone, Serialize)]
pub struct ArpSummary {
    vrf: String,
    info: Row,
    counts: Row,
}

impl Default for ArpSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl ArpSummary {
    pub fn new() -> Self {
        Self {
            vrf: "default".to_owned(),
            info: Row::new(),
            counts: Row::new(),
        }
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn vrf(&self) -> &str {
        &self.vrf
    }

    pub fn resolved(&self) -> i64 {
        self.counts.int_or_neg("cnt-resolved")
    }

    pub fn incomplete(&self) -> i64 {
        self.counts.int_or_neg("cnt-incomplete")
    }

    pub fn throttled(&self) -> i64 {
        self.counts.int_or_neg("cnt-thrtl")
    }

    pub fn unknown(&self) -> i64 {
        self.counts.int_or_neg("cnt-unknown")
    }

    pub fn total(&self) -> i64 {
        self.counts.int_or_neg("cnt-total")
    }
}

impl Entity for ArpSummary {
    fn command(&self) -> String {
        format!("show ip arp summary vrf {}", self.vrf)
    }

    fn clear(&mut self) {
        self.info.clear();
        self.counts.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let rows = table_rows("vrf", body);
        if let Some(row) = select_row(&rows, "vrf-name-out", &self.vrf) {
            self.counts = strip_row(row);
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

    fn row() -> Value {
        json!({
            "vrf-name-out": "default", "cnt-resolved": "12", "cnt-incomplete": "1",
            "cnt-thrtl": "0", "cnt-unknown": "0", "cnt-total": "13"
        })
    }

    #[test]
    fn reads_counters() {
        let arp = loaded(ArpSummary::new(), &json!({"TABLE_vrf": {"ROW_vrf": row()}}));
        assert_eq!(arp.resolved(), 12);
        assert_eq!(arp.incomplete(), 1);
        assert_eq!(arp.total(), 13);
        assert_eq!(arp.command(), "show ip arp summary vrf default");
    }

    #[test]
    fn sentinels_before_refresh() {
        let arp = ArpSummary::new();
        assert_eq!(arp.total(), -1);
        assert_eq!(arp.throttled(), -1);
    }

    #[test]
    fn shape_invariant() {
        assert_shape_invariant(
            ArpSummary::new,
            &json!({"TABLE_vrf": {"ROW_vrf": row()}}),
            &json!({"TABLE_vrf": {"ROW_vrf": [row()]}}),
        );
    }

    #[test]
    fn invalid_vrf_is_ignored() {
        let mut arp = ArpSummary::new();
        arp.set_vrf("bad vrf");
        assert_eq!(arp.vrf(), "default");
        arp.set_vrf("tenant-1");
        assert_eq!(arp.command(), "show ip arp summary vrf tenant-1");
    }
}
