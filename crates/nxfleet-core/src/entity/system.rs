// Software and platform state: version, boot variables, system mode,
// license host-id, virtual services, directory listings, process memory.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{Entity, set_value};
use crate::normalize::{
    Fields, INT_MISSING, NA, Row, drift, key_rows, scalar_text, strip_row, strip_tables,
    table_rows,
};

// ── show version ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct Version {
    info: Row,
}

impl Version {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nxos_version(&self) -> String {
        self.info.str_or_na("nxos_ver_str")
    }

    pub fn bios_version(&self) -> String {
        self.info.str_or_na("bios_ver_str")
    }

    pub fn chassis(&self) -> String {
        self.info.str_or_na("chassis_id")
    }

    pub fn hostname(&self) -> String {
        self.info.str_or_na("host_name")
    }

    pub fn serial(&self) -> String {
        self.info.str_or_na("proc_board_id")
    }

    pub fn image(&self) -> String {
        self.info.str_or_na("nxos_file_name")
    }

    pub fn last_reset_reason(&self) -> String {
        self.info.str_or_na("rr_reason")
    }

    /// Kernel uptime in seconds, `-1` if any component is missing.
    pub fn uptime_secs(&self) -> i64 {
        let parts = [
            (self.info.int_or_neg("kern_uptm_days"), 86_400),
            (self.info.int_or_neg("kern_uptm_hrs"), 3_600),
            (self.info.int_or_neg("kern_uptm_mins"), 60),
            (self.info.int_or_neg("kern_uptm_secs"), 1),
        ];
        if parts.iter().any(|(v, _)| *v < 0) {
            return INT_MISSING;
        }
        parts.iter().map(|(v, scale)| v * scale).sum()
    }
}

impl Entity for Version {
    fn command(&self) -> String {
        "show version".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show boot ────────────────────────────────────────────────────────

/// Current and next-reload boot variables, one slot per supervisor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Boot {
    info: Row,
    current: Row,
    next: Row,
}

/// Supervisor slot of a boot variable; the first sup is index 0.
fn sup_field(row: &Row, key: &str, sup: usize) -> String {
    row.get(key)
        .and_then(|v| v.get(sup))
        .filter(|v| !v.is_boolean())
        .and_then(scalar_text)
        .unwrap_or_else(|| NA.to_owned())
}

impl Boot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_image(&self, sup: usize) -> String {
        sup_field(&self.current, "nxos_image", sup)
    }

    pub fn next_image(&self, sup: usize) -> String {
        sup_field(&self.next, "nxos_image", sup)
    }

    pub fn sup_number(&self, sup: usize) -> String {
        sup_field(&self.current, "sup_number", sup)
    }

    pub fn poap_status(&self, sup: usize) -> String {
        sup_field(&self.current, "poap_status", sup)
    }

    /// True when the image loaded now differs from the one set for reload.
    pub fn reload_changes_image(&self) -> bool {
        (0..2).any(|sup| self.current_image(sup) != self.next_image(sup))
    }
}

fn boot_row(table: &str, body: &Value) -> Row {
    let mut row = table_rows(table, body)
        .first()
        .map(|r| strip_row(r))
        .unwrap_or_default();
    if !row.is_empty() {
        drift::apply(drift::BOOT, &mut row);
    }
    row
}

impl Entity for Boot {
    fn command(&self) -> String {
        "show boot".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.current.clear();
        self.next.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.current = boot_row("Current_Boot_Variables", body);
        self.next = boot_row("Next_Boot_Variables", body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show system mode / show license host-id ──────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemMode {
    info: Row,
}

impl SystemMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// `normal`, `maintenance`, ...
    pub fn mode(&self) -> String {
        self.info.str_or_na("system_mode")
    }
}

impl Entity for SystemMode {
    fn command(&self) -> String {
        "show system mode".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LicenseHostId {
    info: Row,
}

impl LicenseHostId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host_id(&self) -> String {
        self.info.str_or_na("host_id")
    }
}

impl Entity for LicenseHostId {
    fn command(&self) -> String {
        "show license host-id".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show virtual-service list ────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct VirtualService {
    info: Row,
    services: IndexMap<String, Row>,
}

impl VirtualService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn status(&self, name: &str) -> String {
        self.services.get(name).str_or_na("status")
    }

    pub fn package(&self, name: &str) -> String {
        self.services.get(name).str_or_na("package")
    }
}

impl Entity for VirtualService {
    fn command(&self) -> String {
        "show virtual-service list".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.services.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.services = key_rows(table_rows("list", body), "name");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── dir [<target>] ───────────────────────────────────────────────────

/// Filesystem URIs end in `:` and may carry a path (`bootflash:`,
/// `bootflash:/scripts`).
pub fn is_dir_target(x: &str) -> bool {
    x.contains(':') && !x.starts_with(':') && !x.contains(char::is_whitespace)
}

#[derive(Debug, Clone, Serialize)]
pub struct Dir {
    target: String,
    info: Row,
    files: IndexMap<String, Row>,
}

impl Default for Dir {
    fn default() -> Self {
        Self {
            target: "bootflash:".to_owned(),
            info: Row::new(),
            files: IndexMap::new(),
        }
    }
}

impl Dir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, target: &str) {
        set_value(&mut self.target, "target", target, is_dir_target);
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn size(&self, file: &str) -> i64 {
        self.files.get(file).int_or_neg("fsize")
    }

    pub fn timestamp(&self, file: &str) -> String {
        self.files.get(file).str_or_na("timestamp")
    }

    pub fn bytes_used(&self) -> i64 {
        self.info.int_or_neg("bytesused")
    }

    pub fn bytes_free(&self) -> i64 {
        self.info.int_or_neg("bytesfree")
    }

    pub fn bytes_total(&self) -> i64 {
        self.info.int_or_neg("bytestotal")
    }
}

impl Entity for Dir {
    fn command(&self) -> String {
        format!("dir {}", self.target)
    }

    fn clear(&mut self) {
        self.info.clear();
        self.files.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.files = key_rows(table_rows("dir", body), "fname");
    }

    fn info(&self) -> &Row {
        &self.info
    }
}

// ── show processes memory physical ───────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessesMemory {
    info: Row,
    processes: IndexMap<String, Row>,
}

impl ProcessesMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pids(&self) -> impl Iterator<Item = &str> {
        self.processes.keys().map(String::as_str)
    }

    pub fn process(&self, pid: &str) -> String {
        self.processes.get(pid).str_or_na("process")
    }

    /// Resident memory of `pid` in kB.
    pub fn memory(&self, pid: &str) -> i64 {
        self.processes.get(pid).int_or_neg("memory")
    }

    /// Pid of the first process with this name.
    pub fn pid_of(&self, name: &str) -> Option<&str> {
        self.processes
            .iter()
            .find(|(_, r)| r.str_or_na("process") == name)
            .map(|(pid, _)| pid.as_str())
    }

    pub fn total_memory(&self) -> i64 {
        if self.processes.is_empty() {
            return INT_MISSING;
        }
        self.processes.values().map(|r| r.int_or_neg("memory").max(0)).sum()
    }
}

impl Entity for ProcessesMemory {
    fn command(&self) -> String {
        "show processes memory physical".to_owned()
    }

    fn clear(&mut self) {
        self.info.clear();
        self.processes.clear();
    }

    fn load(&mut self, body: &Value) {
        self.info = strip_tables(body);
        self.processes = key_rows(table_rows("process", body), "pid");
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
    fn version_uptime() {
        let body = json!({
            "nxos_ver_str": "9.3(8)", "host_name": "leaf1", "proc_board_id": "FDO1234",
            "kern_uptm_days": "1", "kern_uptm_hrs": "2", "kern_uptm_mins": "3", "kern_uptm_secs": "4"
        });
        let v = loaded(Version::new(), &body);
        assert_eq!(v.nxos_version(), "9.3(8)");
        assert_eq!(v.uptime_secs(), 86_400 + 7_200 + 180 + 4);
        assert_eq!(Version::new().uptime_secs(), -1);
        assert_eq!(Version::new().serial(), "na");
    }

    #[test]
    fn boot_single_sup_is_padded() {
        let body = json!({
            "TABLE_Current_Boot_Variables": {"ROW_Current_Boot_Variables": {
                "sup_number": "sup-1", "nxos_image": "bootflash:/nxos.9.3.8.bin"}},
            "TABLE_Next_Boot_Variables": {"ROW_Next_Boot_Variables": {
                "sup_number": "sup-1", "nxos_image": "bootflash:/nxos.10.2.5.bin"}}
        });
        let b = loaded(Boot::new(), &body);
        assert_eq!(b.current_image(0), "bootflash:/nxos.9.3.8.bin");
        assert_eq!(b.current_image(1), "na");
        assert_eq!(b.sup_number(0), "sup-1");
        assert_eq!(b.poap_status(0), "na");
        assert!(b.reload_changes_image());
    }

    #[test]
    fn boot_dual_sup() {
        let vars = json!({"sup_number": ["sup-1", "sup-2"],
            "nxos_image": ["bootflash:/a.bin", "bootflash:/a.bin"]});
        let body = json!({
            "TABLE_Current_Boot_Variables": {"ROW_Current_Boot_Variables": vars},
            "TABLE_Next_Boot_Variables": {"ROW_Next_Boot_Variables": [vars]}
        });
        let b = loaded(Boot::new(), &body);
        assert_eq!(b.sup_number(1), "sup-2");
        assert!(!b.reload_changes_image());
    }

    #[test]
    fn scalars() {
        let m = loaded(SystemMode::new(), &json!({"system_mode": "maintenance"}));
        assert_eq!(m.mode(), "maintenance");
        let h = loaded(LicenseHostId::new(), &json!({"host_id": "VDH=FDO1234"}));
        assert_eq!(h.host_id(), "VDH=FDO1234");
        assert_eq!(LicenseHostId::new().host_id(), "na");
    }

    #[test]
    fn virtual_services() {
        let row = json!({"name": "guestshell+", "status": "Activated",
            "package": "guestshell.ova"});
        let vs = loaded(
            VirtualService::new(),
            &json!({"TABLE_list": {"ROW_list": row}}),
        );
        assert_eq!(vs.status("guestshell+"), "Activated");
        assert_shape_invariant(
            VirtualService::new,
            &json!({"TABLE_list": {"ROW_list": row}}),
            &json!({"TABLE_list": {"ROW_list": [row]}}),
        );
    }

    #[test]
    fn dir_listing() {
        let mut d = Dir::new();
        assert_eq!(d.command(), "dir bootflash:");
        d.set_target("no colon");
        assert_eq!(d.target(), "bootflash:");
        d.set_target("bootflash:/scripts");
        assert_eq!(d.command(), "dir bootflash:/scripts");
        let body = json!({
            "bytesused": "1000", "bytesfree": "3000", "bytestotal": "4000",
            "TABLE_dir": {"ROW_dir": [
                {"fsize": "600", "timestamp": "Jan 01 00:00:00 2024", "fname": "nxos.bin"},
                {"fsize": "400", "timestamp": "Feb 01 00:00:00 2024", "fname": "poap.py"}
            ]}
        });
        let d = loaded(d, &body);
        assert_eq!(d.files().collect::<Vec<_>>(), vec!["nxos.bin", "poap.py"]);
        assert_eq!(d.size("poap.py"), 400);
        assert_eq!(d.bytes_total(), 4000);
        assert_eq!(d.size("missing"), -1);
    }

    #[test]
    fn process_memory() {
        let body = json!({"TABLE_process": {"ROW_process": [
            {"pid": "1", "process": "init", "memory": "1024"},
            {"pid": "2000", "process": "bgp", "memory": "40960"}
        ]}});
        let p = loaded(ProcessesMemory::new(), &body);
        assert_eq!(p.pid_of("bgp"), Some("2000"));
        assert_eq!(p.memory("2000"), 40_960);
        assert_eq!(p.total_memory(), 41_984);
        assert_eq!(ProcessesMemory::new().total_memory(), -1);
    }
}
