//! Output formatting: device-prefixed columns, or one JSON object per device.
//!
//! Workers render their own lines so the dispatcher only has to concatenate
//! them in device order. Columns are single-space separated with the device
//! name first; sentinels (`na`, `-1`) sit in the same positions real values
//! would.

use std::io::{self, Write};

use serde::Serialize;

use nxfleet_api::ResultCode;
use nxfleet_core::NA;

use crate::cli::OutputFormat;

/// Build one row of cells from anything `Display`.
macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$($cell.to_string()),*]
    };
}
pub(crate) use row;

#[derive(Serialize)]
struct DeviceView<'a, V: ?Sized> {
    device: &'a str,
    code: ResultCode,
    view: &'a V,
}

/// Render one device's result.
///
/// `rows` feed the table format; `view` is serialized whole for JSON. A
/// device that returned no rows because the CLI failed gets a single status
/// line so the failure is visible in table output.
pub fn render<V: Serialize + ?Sized>(
    format: OutputFormat,
    device: &str,
    code: ResultCode,
    view: &V,
    rows: Vec<Vec<String>>,
) -> Vec<String> {
    match format {
        OutputFormat::Table if rows.is_empty() && !code.is_success() => {
            vec![format!("{device}: {code}: {}", code.description())]
        }
        OutputFormat::Table => rows.iter().map(|cells| columns(device, cells)).collect(),
        OutputFormat::Json => vec![json_line(device, code, view)],
    }
}

/// `device cell cell ...`, with empty cells shown as `na`.
pub fn columns(device: &str, cells: &[String]) -> String {
    let mut line = device.to_owned();
    for cell in cells {
        line.push(' ');
        line.push_str(if cell.is_empty() { NA } else { cell });
    }
    line
}

fn json_line<V: Serialize + ?Sized>(device: &str, code: ResultCode, view: &V) -> String {
    serde_json::to_string(&DeviceView { device, code, view })
        .unwrap_or_else(|e| format!("{device}: error: cannot encode view: {e}"))
}

/// Pretty JSON split into lines, each prefixed with the device name.
pub fn pretty_lines<V: Serialize + ?Sized>(device: &str, value: &V) -> Vec<String> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text.lines().map(|l| format!("{device}: {l}")).collect(),
        Err(e) => vec![format!("{device}: error: cannot encode body: {e}")],
    }
}

/// Print lines to stdout. A closed pipe ends output quietly.
pub fn print_lines(lines: &[String]) {
    let mut stdout = io::stdout().lock();
    for line in lines {
        if writeln!(stdout, "{line}").is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn table_rows_lead_with_device() {
        let lines = render(
            OutputFormat::Table,
            "leaf1",
            ResultCode::SUCCESS,
            &json!({}),
            vec![row!["Ethernet1/1", "up", -1], row!["Ethernet1/2", "", 9216]],
        );
        assert_eq!(
            lines,
            ["leaf1 Ethernet1/1 up -1", "leaf1 Ethernet1/2 na 9216"]
        );
    }

    #[test]
    fn failed_cli_without_rows_reports_code() {
        let lines = render(
            OutputFormat::Table,
            "leaf1",
            ResultCode::CLI_ERROR,
            &json!({}),
            Vec::new(),
        );
        assert_eq!(lines, ["leaf1: 400: CLI execution error"]);
    }

    #[test]
    fn successful_empty_view_prints_nothing() {
        let lines = render(OutputFormat::Table, "leaf1", ResultCode::SUCCESS, &json!({}), Vec::new());
        assert!(lines.is_empty());
    }

    #[test]
    fn json_is_one_line_per_device() {
        let lines = render(
            OutputFormat::Json,
            "leaf1",
            ResultCode::SUCCESS,
            &json!({"total": 3}),
            vec![row!["ignored"]],
        );
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value =
            serde_json::from_str(&lines[0]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(parsed, json!({"device": "leaf1", "code": 200, "view": {"total": 3}}));
    }

    #[test]
    fn pretty_lines_are_prefixed() {
        let lines = pretty_lines("spine1", &json!({"a": 1}));
        assert_eq!(lines, ["spine1: {", "spine1:   \"a\": 1", "spine1: }"]);
    }
}
