// Hardware forwarding (FIB) entities: per-prefix route detail and summary.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nxfleet_api::verify;

use super::{Entity, Family, is_vrf_name, set_subject, set_value};
use crate::normalize::{Fields, INT_MISSING, Row, select_row, strip_row, strip_tables, table_rows};

/// Walk `TABLE_module -> TABLE_vrf` and return the VRF row for `module`/`vrf`.
fn module_vrf(body: &Value, module: &str, vrf: &str) -> Option<Row> {
    let modules = table_rows("module", body);
    let module_row = select_row(&modules, "module_number", module)?;
    let module_row = Value::Object(module_row.clone());
    let vrfs = table_rows("vrf", &module_row);
    select_row(&vrfs, "vrf_name", vrf).cloned()
}

// ── show forwarding ipv{4,6} route <prefix> detail vrf <vrf> module <mod>

/// FIB entry for one prefix on one linecard.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardingRoute {
    family: Family,
    vrf: String,
    module: String,
    prefix: Option<String>,
    info: Row,
    prefix_info: Row,
    /// Always a list, even when the device printed a single path object.
    path_info: Vec<Row>,
}

impl ForwardingRoute {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            vrf: "default".to_owned(),
            module: "1".to_owned(),
            prefix: None,
            info: Row::new(),
            prefix_info: Row::new(),
            path_info: Vec::new(),
        }
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn set_module(&mut self, module: &str) {
        set_value(&mut self.module, "module", module, verify::is_module);
    }

    pub fn set_prefix(&mut self, prefix: &str) {
        let family = self.family;
        set_subject(&mut self.prefix, "prefix", prefix, |x| family.is_prefix(x));
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn path_info(&self) -> &[Row] {
        &self.path_info
    }

    pub fn path_count(&self) -> i64 {
        if self.prefix_info.is_empty() {
            return INT_MISSING;
        }
        i64::try_from(self.path_info.len()).unwrap_or(INT_MISSING)
    }

    pub fn next_hops(&self) -> Vec<String> {
        self.path_info.iter().map(|p| p.str_or_na("ip_nexthop")).collect()
    }

    pub fn interfaces(&self) -> Vec<String> {
        self.path_info.iter().map(|p| p.str_or_na("ifname")).collect()
    }

    pub fn partial_install(&self) -> bool {
        self.prefix_info.bool_or_false("partial_install")
    }
}

impl Entity for ForwardingRoute {
    fn command(&self) -> String {
        let prefix = self.prefix.as_deref().unwrap_or_default();
        format!(
            "show forwarding {} route {prefix} detail vrf {} module {}",
            self.family.keyword(),
            self.vrf,
            self.module
        )
    }

    fn clear(&mut self) {
        self.info.clear();
        self.prefix_info.clear();
        self.path_info.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let Some(vrf) = module_vrf(body, &self.module, &self.vrf) else {
            debug!(module = %self.module, vrf = %self.vrf, "no forwarding table in reply");
            return;
        };
        let vrf = Value::Object(vrf);
        let prefixes = table_rows("prefix", &vrf);
        let want = self.prefix.as_deref().unwrap_or_default();
        let Some(prefix) = select_row(&prefixes, "ipprefix", want) else {
            return;
        };
        self.prefix_info = strip_row(prefix);
        let prefix = Value::Object(prefix.clone());
        self.path_info = table_rows("path", &prefix).into_iter().map(strip_row).collect();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show forwarding ipv{4,6} route summary vrf <vrf> module <mod> ─────

/// FIB occupancy and churn counters for one VRF on one linecard.
#[derive(Debug, Clone, Serialize)]
pub struct ForwardingRouteSummary {
    family: Family,
    vrf: String,
    module: String,
    info: Row,
    counts: Row,
    routes_per_mask: IndexMap<i64, i64>,
}

impl ForwardingRouteSummary {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            vrf: "default".to_owned(),
            module: "1".to_owned(),
            info: Row::new(),
            counts: Row::new(),
            routes_per_mask: IndexMap::new(),
        }
    }

    pub fn set_vrf(&mut self, vrf: &str) {
        set_value(&mut self.vrf, "vrf", vrf, is_vrf_name);
    }

    pub fn set_module(&mut self, module: &str) {
        set_value(&mut self.module, "module", module, verify::is_module);
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn routes_per_mask(&self) -> &IndexMap<i64, i64> {
        &self.routes_per_mask
    }

    /// Route count for one mask length; invalid lengths read `-1`, valid
    /// lengths with no routes read `0` once refreshed.
    pub fn routes_for_mask(&self, mask_len: i64) -> i64 {
        if !self.family.is_mask_len(mask_len) || self.counts.is_empty() {
            return INT_MISSING;
        }
        self.routes_per_mask.get(&mask_len).copied().unwrap_or(0)
    }

    /// Sum of route counts over masks in `ge..=le`.
    pub fn routes_in_mask_range(&self, ge: i64, le: i64) -> i64 {
        if self.counts.is_empty() {
            return INT_MISSING;
        }
        self.routes_per_mask
            .iter()
            .filter(|(m, _)| (ge..=le).contains(*m))
            .map(|(_, c)| *c)
            .sum()
    }

    pub fn route_count(&self) -> i64 {
        self.counts.int_or_neg("route_count")
    }

    pub fn path_count(&self) -> i64 {
        self.counts.int_or_neg("path_count")
    }

    pub fn route_update_count(&self) -> i64 {
        self.churn("route_update_count", "prefix_update")
    }

    pub fn route_insert_count(&self) -> i64 {
        self.churn("route_insert_count", "prefix_insert")
    }

    pub fn route_delete_count(&self) -> i64 {
        self.churn("route_delete_count", "prefix_delete")
    }

    /// Churn counters appear under either name depending on the release.
    fn churn(&self, key: &str, legacy: &str) -> i64 {
        if self.counts.contains_key(key) {
            self.counts.int_or_neg(key)
        } else {
            self.counts.int_or_neg(legacy)
        }
    }
}

impl Entity for ForwardingRouteSummary {
    fn command(&self) -> String {
        format!(
            "show forwarding {} route summary vrf {} module {}",
            self.family.keyword(),
            self.vrf,
            self.module
        )
    }

    fn clear(&mut self) {
        self.info.clear();
        self.counts.clear();
        self.routes_per_mask.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let Some(vrf) = module_vrf(body, &self.module, &self.vrf) else {
            debug!(module = %self.module, vrf = %self.vrf, "no forwarding summary in reply");
            return;
        };
        self.counts = strip_row(&vrf);
        let vrf = Value::Object(vrf);
        for row in table_rows("mask", &vrf) {
            let mask = row.int_or_neg("mask_length");
            if !self.family.is_mask_len(mask) {
                debug!(mask, "ignoring out-of-range mask length");
                continue;
            }
            *self.routes_per_mask.entry(mask).or_insert(0) += row.int_or_neg("route_count").max(0);
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
