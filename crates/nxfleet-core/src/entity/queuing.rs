// show queuing [tabular] interface <if>

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{Entity, is_interface_name, set_subject};
use crate::normalize::queuing::{qos_group_tag, stat_label_to_tag, unit_label_to_tag};
use crate::normalize::{
    Fields, INT_MISSING, Row, key_rows, scalar_text, select_row, snake_label, strip_row,
    strip_tables, table_rows, to_list,
};

/// Unicast and multicast values of one statistic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueCounter {
    pub uc: i64,
    pub mc: i64,
}

impl QueueCounter {
    pub fn total(self) -> i64 {
        self.uc.max(0) + self.mc.max(0)
    }

    pub fn is_zero(self) -> bool {
        self.total() == 0
    }
}

/// unit tag -> counter
pub type UnitCounters = IndexMap<String, QueueCounter>;
/// stat tag -> unit tag -> counter
pub type StatCounters = IndexMap<String, UnitCounters>;

fn stat_tag(label: &str) -> String {
    stat_label_to_tag(label).map_or_else(
        || {
            debug!(label, "unrecognized queuing statistic, using snake-cased label");
            snake_label(label)
        },
        str::to_owned,
    )
}

fn unit_tag(label: &str) -> String {
    unit_label_to_tag(label).map_or_else(
        || {
            debug!(label, "unrecognized queuing unit, using snake-cased label");
            snake_label(label)
        },
        str::to_owned,
    )
}

fn counter_value(values: &[&Value], i: usize) -> i64 {
    values
        .get(i)
        .or_else(|| values.last())
        .and_then(|v| scalar_text(v))
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(INT_MISSING)
}

/// Expand one stats entry into `(unit, counter)` pairs.
///
/// A statistic reported in two units comes back with a list of unit labels
/// next to lists of values; a list may be shorter than its siblings, in which
/// case its last element repeats.
fn entry_counters(entry: &Row) -> Vec<(String, QueueCounter)> {
    let units = entry.get("eq-stat-units").map(to_list).unwrap_or_default();
    let uc = entry.get("eq-uc-stat-value").map(to_list).unwrap_or_default();
    let mc = entry.get("eq-mc-stat-value").map(to_list).unwrap_or_default();
    let width = units.len().max(uc.len()).max(mc.len());
    if units.len() != width || uc.len() != width || mc.len() != width {
        debug!(
            units = units.len(),
            uc = uc.len(),
            mc = mc.len(),
            "queuing label/value cardinality mismatch"
        );
    }
    (0..width)
        .map(|i| {
            let unit = units
                .get(i)
                .or_else(|| units.last())
                .and_then(|v| scalar_text(v))
                .map_or_else(|| "value".to_owned(), |u| unit_tag(&u));
            let counter = QueueCounter {
                uc: counter_value(&uc, i),
                mc: counter_value(&mc, i),
            };
            (unit, counter)
        })
        .collect()
}

// ── show queuing interface <if> ──────────────────────────────────────

/// Egress queuing statistics per QoS group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceQueuing {
    interface: Option<String>,
    info: Row,
    /// qos-group tag -> stat tag -> unit tag -> counter
    groups: IndexMap<String, StatCounters>,
}

impl InterfaceQueuing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    pub fn groups(&self) -> &IndexMap<String, StatCounters> {
        &self.groups
    }

    fn counter(&self, group: &str, stat: &str, unit: &str) -> Option<QueueCounter> {
        self.groups.get(group)?.get(stat)?.get(unit).copied()
    }

    pub fn uc(&self, group: &str, stat: &str, unit: &str) -> i64 {
        self.counter(group, stat, unit).map_or(INT_MISSING, |c| c.uc)
    }

    pub fn mc(&self, group: &str, stat: &str, unit: &str) -> i64 {
        self.counter(group, stat, unit).map_or(INT_MISSING, |c| c.mc)
    }

    /// Every group's counters added together, per stat and unit.
    pub fn summed(&self) -> StatCounters {
        let mut out = StatCounters::new();
        for stats in self.groups.values() {
            for (stat, units) in stats {
                let slot = out.entry(stat.clone()).or_default();
                for (unit, c) in units {
                    let sum = slot.entry(unit.clone()).or_default();
                    sum.uc += c.uc.max(0);
                    sum.mc += c.mc.max(0);
                }
            }
        }
        out
    }
}

impl Entity for InterfaceQueuing {
    fn command(&self) -> String {
        let interface = self.interface.as_deref().unwrap_or_default();
        format!("show queuing interface {interface}")
    }

    fn clear(&mut self) {
        self.info.clear();
        self.groups.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        let interfaces = table_rows("queuing_interface", body);
        let want = self.interface.as_deref().unwrap_or_default();
        let Some(interface) = select_row(&interfaces, "if_name_str", want) else {
            debug!(interface = want, "no queuing table in reply");
            return;
        };
        let interface = Value::Object(interface.clone());
        for group in table_rows("qosgrp_egress_stats", &interface) {
            let Some(label) = group.get("eq-qosgrp").and_then(scalar_text) else {
                continue;
            };
            let stats = self.groups.entry(qos_group_tag(&label)).or_default();
            let group = Value::Object(group.clone());
            for entry in table_rows("qosgrp_egress_stats_entry", &group) {
                let stat = stat_tag(&entry.str_or_na("eq-stat-type"));
                let units = stats.entry(stat).or_default();
                for (unit, counter) in entry_counters(entry) {
                    units.insert(unit, counter);
                }
            }
        }
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show queuing tabular interface <if> ──────────────────────────────

/// Per-QoS-group counters in the compact tabular layout.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueuingTabular {
    interface: Option<String>,
    info: Row,
    groups: IndexMap<String, Row>,
}

impl QueuingTabular {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interface(&mut self, interface: &str) {
        set_subject(&mut self.interface, "interface", interface, is_interface_name);
    }

    pub fn groups(&self) -> &IndexMap<String, Row> {
        &self.groups
    }

    pub fn counter(&self, group: &str, field: &str) -> i64 {
        self.groups.get(group).int_or_neg(field)
    }
}

impl Entity for QueuingTabular {
    fn command(&self) -> String {
        let interface = self.interface.as_deref().unwrap_or_default();
        format!("show queuing tabular interface {interface}")
    }

    fn clear(&mut self) {
        self.info.clear();
        self.groups.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.groups = key_rows(table_rows("qos_tab", body), "qosgrp")
            .into_iter()
            .map(|(group, row)| (qos_group_tag(&group), strip_row(&row)))
            .collect();
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
