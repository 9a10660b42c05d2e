// Chassis hardware: show inventory, show module, show locator-led status.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use nxfleet_api::verify;

use super::{Entity, set_subject};
use crate::normalize::{Fields, Row, key_rows, scalar_text, strip_row, strip_tables, table_rows};

fn keyed(table: &str, key: &str, body: &Value) -> IndexMap<String, Row> {
    key_rows(table_rows(table, body), key)
        .into_iter()
        .map(|(k, v)| (k, strip_row(&v)))
        .collect()
}

// ── show inventory ───────────────────────────────────────────────────

/// FRUs keyed by their `name` column (`"Chassis"`, `"Slot 1"`, `"Fan 1"`...).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    info: Row,
    items: IndexMap<String, Row>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn description(&self, name: &str) -> String {
        self.items.get(name).str_or_na("desc")
    }

    pub fn product_id(&self, name: &str) -> String {
        self.items.get(name).str_or_na("productid")
    }

    pub fn version_id(&self, name: &str) -> String {
        self.items.get(name).str_or_na("vendorid")
    }

    pub fn serial(&self, name: &str) -> String {
        self.items.get(name).str_or_na("serialnum")
    }
}

impl Entity for Inventory {
    fn command(&self) -> String {
        "show inventory".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.items.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.items = keyed("inv", "name", body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show module ──────────────────────────────────────────────────────

/// Linecard and supervisor inventory. NX-OS splits a module's details over
/// four tables, each keyed by a differently named module-number column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleInfo {
    module: Option<String>,
    info: Row,
    modinfo: IndexMap<String, Row>,
    wwninfo: IndexMap<String, Row>,
    macinfo: IndexMap<String, Row>,
    diaginfo: IndexMap<String, Row>,
}

impl ModuleInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_module(&mut self, module: &str) {
        set_subject(&mut self.module, "module", module, verify::is_module);
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modinfo.keys().map(String::as_str)
    }

    fn get<'a>(&self, table: &'a IndexMap<String, Row>) -> Option<&'a Row> {
        table.get(self.module.as_deref()?)
    }

    pub fn model(&self) -> String {
        self.get(&self.modinfo).str_or_na("model")
    }

    pub fn module_type(&self) -> String {
        self.get(&self.modinfo).str_or_na("modtype")
    }

    pub fn status(&self) -> String {
        self.get(&self.modinfo).str_or_na("status")
    }

    pub fn ports(&self) -> i64 {
        self.get(&self.modinfo).int_or_neg("ports")
    }

    pub fn software(&self) -> String {
        self.get(&self.wwninfo).str_or_na("sw")
    }

    pub fn hardware(&self) -> String {
        self.get(&self.wwninfo).str_or_na("hw")
    }

    pub fn mac_range(&self) -> String {
        self.get(&self.macinfo).str_or_na("mac")
    }

    pub fn serial(&self) -> String {
        self.get(&self.macinfo).str_or_na("serialnum")
    }

    pub fn diag_status(&self) -> String {
        self.get(&self.diaginfo).str_or_na("diagstatus")
    }
}

impl Entity for ModuleInfo {
    fn command(&self) -> String {
        "show module".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.modinfo.clear();
        self.wwninfo.clear();
        self.macinfo.clear();
        self.diaginfo.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.modinfo = keyed("modinfo", "modinf", body);
        self.wwninfo = keyed("modwwninfo", "modwwn", body);
        self.macinfo = keyed("modmacinfo", "modmac", body);
        self.diaginfo = keyed("moddiaginfo", "mod", body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show locator-led status ──────────────────────────────────────────

/// Beacon LED state of the chassis, modules, fans and power supplies.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocatorLed {
    info: Row,
    /// Display label (`"Module 1"`, `"Fan 2"`) -> LED status.
    leds: IndexMap<String, String>,
}

impl LocatorLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chassis(&self) -> String {
        self.info.str_or_na("chassis_led_status")
    }

    pub fn leds(&self) -> &IndexMap<String, String> {
        &self.leds
    }

    /// Components whose beacon is lit.
    pub fn lit(&self) -> Vec<&str> {
        self.leds
            .iter()
            .filter(|(_, status)| status.eq_ignore_ascii_case("on"))
            .map(|(label, _)| label.as_str())
            .collect()
    }

    fn collect(&mut self, body: &Value, table: &str, key: &str, status: &str, label: &str) {
        for row in table_rows(table, body) {
            if let Some(id) = row.get(key).and_then(scalar_text) {
                self.leds.insert(format!("{label} {id}"), row.str_or_na(status));
            }
        }
    }
}

impl Entity for LocatorLed {
    fn command(&self) -> String {
        "show locator-led status".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.leds.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        if self.info.contains_key("chassis_led_status") {
            let chassis = self.chassis();
            self.leds.insert("Chassis".to_owned(), chassis);
        }
        self.collect(body, "modled", "modnum", "mod_led_status", "Module");
        self.collect(body, "fanled", "fannum", "fan_led_status", "Fan");
        self.collect(body, "psled", "psnum", "ps_led_status", "PS");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}
