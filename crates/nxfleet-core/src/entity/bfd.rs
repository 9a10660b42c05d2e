// show bfd ipv{4,6} neighbors detail

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use nxfleet_api::verify;

use super::{Entity, Family, set_subject};
use crate::normalize::{Fields, Row, drift, key_rows, strip_row, strip_tables, table_rows};

/// BFD sessions keyed by local discriminator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BfdNeighbors {
    family: Family,
    local_disc: Option<String>,
    info: Row,
    neighbors: IndexMap<String, Row>,
}

impl BfdNeighbors {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    pub fn set_local_disc(&mut self, local_disc: &str) {
        set_subject(&mut self.local_disc, "local_disc", local_disc, |x| verify::is_digits(x));
    }

    pub fn local_disc(&self) -> Option<&str> {
        self.local_disc.as_deref()
    }

    pub fn local_discs(&self) -> impl Iterator<Item = &str> {
        self.neighbors.keys().map(String::as_str)
    }

    /// Local discriminator of the session to `dest`, if any.
    pub fn local_disc_for(&self, dest: &str) -> Option<&str> {
        self.neighbors
            .iter()
            .find(|(_, r)| r.str_or_na("dest_ip_addr") == dest)
            .map(|(k, _)| k.as_str())
    }

    fn session(&self) -> Option<&Row> {
        self.neighbors.get(self.local_disc.as_deref()?)
    }

    pub fn state(&self) -> String {
        self.session().str_or_na("state")
    }

    pub fn remote_disc(&self) -> String {
        self.session().str_or_na("remote_disc")
    }

    pub fn dest(&self) -> String {
        self.session().str_or_na("dest_ip_addr")
    }

    pub fn src(&self) -> String {
        self.session().str_or_na("src_ip_addr")
    }

    pub fn interface(&self) -> String {
        self.session().str_or_na("intf")
    }

    pub fn vrf(&self) -> String {
        self.session().str_or_na("vrf_name")
    }

    /// Detect timer in milliseconds.
    pub fn detect_timer(&self) -> i64 {
        self.session().int_or_neg("detect_timer")
    }

    pub fn tx_interval(&self) -> i64 {
        self.session().int_or_neg("tx_intvl")
    }

    pub fn rx_interval(&self) -> i64 {
        self.session().int_or_neg("rx_intvl")
    }

    pub fn multiplier(&self) -> i64 {
        self.session().int_or_neg("multiplier")
    }

    pub fn holddown(&self) -> i64 {
        self.session().int_or_neg("holddown")
    }

    pub fn up_time_secs(&self) -> f64 {
        self.session().secs_or_neg("up_time")
    }
}

impl Entity for BfdNeighbors {
    fn command(&self) -> String {
        format!("show bfd {} neighbors detail", self.family.keyword())
    }

    fn clear(&mut self) {
        self.info.clear();
        self.neighbors.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let rows: Vec<Row> = table_rows("bfdNeighbor", body)
            .into_iter()
            .map(|r| {
                let mut r = strip_row(r);
                drift::apply(drift::BFD_NEIGHBOR, &mut r);
                r
            })
            .collect();
        self.neighbors = key_rows(&rows, "local_disc");
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

    fn session(timer_key: &str) -> Value {
        json!({
            "local_disc": "1090519041", "remote_disc": "1090519042",
            "dest_ip_addr": "10.0.0.2", "src_ip_addr": "10.0.0.1", "state": "Up",
            "intf": "Ethernet1/1", "multiplier": "3", "tx_intvl": "300", "rx_intvl": "300",
            "up_time": "1d2h", timer_key: "900"
        })
    }

    #[test]
    fn dectect_timer_is_read_as_detect_timer() {
        let body = json!({"TABLE_bfdNeighbor": {"ROW_bfdNeighbor": session("dectect_timer")}});
        let mut bfd = loaded(BfdNeighbors::new(Family::Ipv4), &body);
        bfd.set_local_disc("1090519041");
        assert_eq!(bfd.detect_timer(), 900);
        assert_eq!(bfd.state(), "Up");
        assert_eq!(bfd.multiplier(), 3);
        assert!((bfd.up_time_secs() - 93_600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn large_dectect_timer_value() {
        let body = json!({"TABLE_bfdNeighbor": {"ROW_bfdNeighbor": {
            "local_disc": "1090519041", "dest_ip_addr": "10.0.0.2", "dectect_timer": "8000000"
        }}});
        let mut bfd = loaded(BfdNeighbors::new(Family::Ipv4), &body);
        bfd.set_local_disc("1090519041");
        assert_eq!(bfd.detect_timer(), 8_000_000);
    }

    #[test]
    fn canonical_detect_timer() {
        let body = json!({"TABLE_bfdNeighbor": {"ROW_bfdNeighbor": [session("detect_timer")]}});
        let mut bfd = loaded(BfdNeighbors::new(Family::Ipv6), &body);
        bfd.set_local_disc("1090519041");
        assert_eq!(bfd.detect_timer(), 900);
        assert_eq!(bfd.local_disc_for("10.0.0.2"), Some("1090519041"));
        assert_eq!(bfd.command(), "show bfd ipv6 neighbors detail");
    }

    #[test]
    fn selector_and_sentinels() {
        let mut bfd = BfdNeighbors::new(Family::Ipv4);
        bfd.set_local_disc("abc");
        assert_eq!(bfd.local_disc(), None);
        assert_eq!(bfd.detect_timer(), -1);
        assert_eq!(bfd.dest(), "na");
    }

    #[test]
    fn shape_invariant() {
        assert_shape_invariant(
            || BfdNeighbors::new(Family::Ipv4),
            &json!({"TABLE_bfdNeighbor": {"ROW_bfdNeighbor": session("dectect_timer")}}),
            &json!({"TABLE_bfdNeighbor": {"ROW_bfdNeighbor": [session("dectect_timer")]}}),
        );
    }
}
