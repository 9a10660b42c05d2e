// show system internal access-list resource utilization module <mod>

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use nxfleet_api::verify;

use super::{Entity, set_value};
use crate::normalize::{
    FLOAT_MISSING, Fields, INT_MISSING, Row, scalar_text, select_row, snake_label, strip_tables,
    table_rows,
};

/// Usage of one TCAM feature region on one forwarding instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcamUsage {
    /// Label as the device printed it (`"Ingress RACL"`).
    pub title: String,
    pub used: i64,
    pub free: i64,
    pub percent: f64,
}

/// ACL TCAM utilization for one module, per instance and feature.
#[derive(Debug, Clone, Serialize)]
pub struct AclTcam {
    module: String,
    info: Row,
    /// instance -> feature tag -> usage
    instances: IndexMap<String, IndexMap<String, TcamUsage>>,
}

impl Default for AclTcam {
    fn default() -> Self {
        Self {
            module: "1".to_owned(),
            info: Row::new(),
            instances: IndexMap::new(),
        }
    }
}

impl AclTcam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_module(&mut self, module: &str) {
        set_value(&mut self.module, "module", module, verify::is_module);
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    /// Feature tags seen on any instance, in first-seen order.
    pub fn features(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for feature in self.instances.values().flat_map(IndexMap::keys) {
            if !seen.contains(&feature.as_str()) {
                seen.push(feature);
            }
        }
        seen
    }

    pub fn usage(&self, instance: &str, feature: &str) -> Option<&TcamUsage> {
        self.instances.get(instance)?.get(feature)
    }

    pub fn used(&self, instance: &str, feature: &str) -> i64 {
        self.usage(instance, feature).map_or(INT_MISSING, |u| u.used)
    }

    pub fn free(&self, instance: &str, feature: &str) -> i64 {
        self.usage(instance, feature).map_or(INT_MISSING, |u| u.free)
    }

    pub fn percent(&self, instance: &str, feature: &str) -> f64 {
        self.usage(instance, feature).map_or(FLOAT_MISSING, |u| u.percent)
    }

    pub fn title(&self, feature: &str) -> String {
        self.instances
            .values()
            .find_map(|f| f.get(feature))
            .map_or_else(|| crate::normalize::NA.to_owned(), |u| u.title.clone())
    }

    fn across<'a>(&'a self, feature: &'a str) -> impl Iterator<Item = &'a TcamUsage> + 'a {
        self.instances.values().filter_map(move |f| f.get(feature))
    }

    /// `used` of `feature` on every instance that reports it.
    pub fn all_used(&self, feature: &str) -> Vec<i64> {
        self.across(feature).map(|u| u.used).collect()
    }

    pub fn all_free(&self, feature: &str) -> Vec<i64> {
        self.across(feature).map(|u| u.free).collect()
    }

    pub fn all_percent(&self, feature: &str) -> Vec<f64> {
        self.across(feature).map(|u| u.percent).collect()
    }

    pub fn max_used(&self, feature: &str) -> i64 {
        self.across(feature).map(|u| u.used).max().unwrap_or(INT_MISSING)
    }

    pub fn min_used(&self, feature: &str) -> i64 {
        self.across(feature).map(|u| u.used).min().unwrap_or(INT_MISSING)
    }

    pub fn max_free(&self, feature: &str) -> i64 {
        self.across(feature).map(|u| u.free).max().unwrap_or(INT_MISSING)
    }

    pub fn min_free(&self, feature: &str) -> i64 {
        self.across(feature).map(|u| u.free).min().unwrap_or(INT_MISSING)
    }

    pub fn max_percent(&self, feature: &str) -> f64 {
        self.across(feature)
            .map(|u| u.percent)
            .reduce(f64::max)
            .unwrap_or(FLOAT_MISSING)
    }

    pub fn min_percent(&self, feature: &str) -> f64 {
        self.across(feature)
            .map(|u| u.percent)
            .reduce(f64::min)
            .unwrap_or(FLOAT_MISSING)
    }
}

impl Entity for AclTcam {
    fn command(&self) -> String {
        format!(
            "show system internal access-list resource utilization module {}",
            self.module
        )
    }

    fn clear(&mut self) {
        self.info.clear();
        self.instances.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let modules = table_rows("module", body);
        // Single-module boxes print the instance table at the top level.
        let module = if modules.is_empty() {
            body.clone()
        } else {
            let Some(row) = select_row(&modules, "module_number", &self.module) else {
                return;
            };
            Value::Object(row.clone())
        };
        for instance in table_rows("instance", &module) {
            let Some(name) = instance.get("instance").and_then(scalar_text) else {
                continue;
            };
            let instance = Value::Object(instance.clone());
            let features: IndexMap<String, TcamUsage> = table_rows("resource_util", &instance)
                .into_iter()
                .filter_map(|row| {
                    let title = row.get("ntype").and_then(scalar_text)?;
                    let usage = TcamUsage {
                        used: row.int_or_neg("used_rows"),
                        free: row.int_or_neg("free_rows"),
                        percent: row.float_or_neg("percentage"),
                        title: title.trim().to_owned(),
                    };
                    Some((snake_label(&title), usage))
                })
                .collect();
            debug!(instance = %name, features = features.len(), "tcam instance");
            self.instances.insert(name, features);
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
