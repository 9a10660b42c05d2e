// ── Response-shape normalization ──
//
// NX-OS renders a table with one row as a bare object and with many rows as
// an array, wraps each table as `TABLE_<name>: {ROW_<name>: ...}`, and
// delivers most numbers as strings. Everything an entity reads goes through
// the helpers here so that the row-shape and sentinel policies live in one
// place.

pub mod drift;
pub mod queuing;

use serde_json::{Map, Value};
use tracing::debug;

use crate::timer::parse_timer;

/// Sentinel for a string field that is absent or has no subject.
pub const NA: &str = "na";
/// Sentinel for an integer field that is absent or has no subject.
pub const INT_MISSING: i64 = -1;
/// Sentinel for a float field that is absent or has no subject.
pub const FLOAT_MISSING: f64 = -1.0;

pub type Row = Map<String, Value>;

// ── Row-shape coercion ───────────────────────────────────────────────

/// Sequence passthrough, scalar -> `[x]`, null -> `[]`.
pub fn to_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// `to_list(obj["TABLE_<name>"]["ROW_<name>"])`, or `None` when either
/// wrapper key is missing.
pub fn get_table_row<'a>(name: &str, obj: &'a Value) -> Option<Vec<&'a Value>> {
    get_table_row_sep(name, obj, '_')
}

/// Like [`get_table_row`] for the few CLIs that spell the wrappers
/// `TABLE-<name>` / `ROW-<name>`.
pub fn get_table_row_sep<'a>(name: &str, obj: &'a Value, sep: char) -> Option<Vec<&'a Value>> {
    let rows = obj
        .get(format!("TABLE{sep}{name}"))?
        .get(format!("ROW{sep}{name}"))?;
    Some(to_list(rows))
}

/// Object rows of a table; a missing table or non-object rows yield nothing.
pub fn table_rows<'a>(name: &str, obj: &'a Value) -> Vec<&'a Row> {
    get_table_row(name, obj)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::as_object)
        .collect()
}

/// Copy of `obj` without its `TABLE_*` children.
pub fn strip_tables(obj: &Value) -> Row {
    obj.as_object().map(strip_row).unwrap_or_default()
}

/// [`strip_tables`] for a row already known to be an object.
pub fn strip_row(row: &Row) -> Row {
    row.iter()
        .filter(|(k, _)| !k.starts_with("TABLE_") && !k.starts_with("TABLE-"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Index rows by the string form of `key`. Rows without the key are skipped;
/// a later duplicate replaces an earlier one.
pub fn key_rows<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    key: &str,
) -> indexmap::IndexMap<String, Row> {
    rows.into_iter()
        .filter_map(|row| {
            let k = row.get(key).and_then(scalar_text)?;
            Some((k, row.clone()))
        })
        .collect()
}

/// First row whose `key` equals `want`. No match yields `None`, so readers
/// fall through to their sentinels rather than another row's data.
pub fn select_row<'a>(rows: &[&'a Row], key: &str, want: &str) -> Option<&'a Row> {
    let found = rows
        .iter()
        .find(|r| r.get(key).and_then(scalar_text).as_deref() == Some(want))
        .copied();
    if found.is_none() {
        debug!(key, want, rows = rows.len(), "no row matches selector");
    }
    found
}

// ── Scalar readers ───────────────────────────────────────────────────

/// String form of a scalar leaf. Numbers and booleans are rendered; arrays,
/// objects and null are not scalars.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "enabled" => Some(true),
            "false" | "no" | "disabled" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Typed reads with sentinel fallbacks, over anything that can look up a key.
pub trait Fields {
    fn field(&self, key: &str) -> Option<&Value>;

    fn str_or_na(&self, key: &str) -> String {
        self.field(key)
            .and_then(scalar_text)
            .unwrap_or_else(|| NA.to_owned())
    }

    fn int_or_neg(&self, key: &str) -> i64 {
        self.field(key).and_then(value_as_i64).unwrap_or(INT_MISSING)
    }

    fn float_or_neg(&self, key: &str) -> f64 {
        self.field(key).and_then(value_as_f64).unwrap_or(FLOAT_MISSING)
    }

    fn bool_or_false(&self, key: &str) -> bool {
        self.field(key).and_then(value_as_bool).unwrap_or(false)
    }

    /// Duration field parsed by the timer parser.
    fn secs_or_neg(&self, key: &str) -> f64 {
        match self.field(key) {
            Some(Value::String(s)) => parse_timer(s),
            Some(other) => value_as_f64(other).unwrap_or(FLOAT_MISSING),
            None => FLOAT_MISSING,
        }
    }
}

impl Fields for Row {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl Fields for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: Fields> Fields for Option<&T> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.and_then(|inner| inner.field(key))
    }
}

/// Lowercase, underscore-separated form of a display label
/// (`"Ingress RACL"` -> `"ingress_racl"`).
pub fn snake_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for ch in label.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_list_coerces_scalars() {
        let one = json!({"a": 1});
        assert_eq!(to_list(&one), vec![&one]);
        let many = json!([1, 2]);
        assert_eq!(to_list(&many).len(), 2);
        assert!(to_list(&Value::Null).is_empty());
    }

    #[test]
    fn get_table_row_is_shape_invariant() {
        let scalar = json!({"TABLE_vrf": {"ROW_vrf": {"vrf-name-out": "default"}}});
        let list = json!({"TABLE_vrf": {"ROW_vrf": [{"vrf-name-out": "default"}]}});
        assert_eq!(get_table_row("vrf", &scalar), get_table_row("vrf", &list));
        assert_eq!(get_table_row("vrf", &json!({})), None);
        assert_eq!(get_table_row("vrf", &json!({"TABLE_vrf": {}})), None);
    }

    #[test]
    fn hyphenated_wrappers() {
        let body = json!({"TABLE-macaddtblcount": {"ROW-macaddtblcount": {"dyn_cnt": "3"}}});
        assert_eq!(get_table_row_sep("macaddtblcount", &body, '-').unwrap().len(), 1);
    }

    #[test]
    fn strip_tables_keeps_scalars() {
        let body = json!({"a": 1, "TABLE_x": {"ROW_x": []}, "b": "c"});
        let stripped = strip_tables(&body);
        assert_eq!(stripped.len(), 2);
        assert!(!stripped.contains_key("TABLE_x"));
    }

    #[test]
    fn readers_accept_numeric_strings() {
        let row = json!({"i": "42", "f": "18.20", "n": 7, "b": "true", "t": "1d0h", "s": 5});
        assert_eq!(row.int_or_neg("i"), 42);
        assert!((row.float_or_neg("f") - 18.2).abs() < f64::EPSILON);
        assert_eq!(row.int_or_neg("n"), 7);
        assert_eq!(row.str_or_na("n"), "7");
        assert!(row.bool_or_false("b"));
        assert!((row.secs_or_neg("t") - 86_400.0).abs() < f64::EPSILON);
        assert_eq!(row.int_or_neg("f"), 18);
    }

    #[test]
    fn readers_fall_back_to_sentinels() {
        let row = json!({"bad": "abc", "obj": {}});
        assert_eq!(row.int_or_neg("bad"), INT_MISSING);
        assert_eq!(row.str_or_na("missing"), NA);
        assert_eq!(row.str_or_na("obj"), NA);
        assert!(!row.bool_or_false("missing"));

        let none: Option<&Row> = None;
        assert_eq!(none.int_or_neg("x"), INT_MISSING);
        assert!((none.float_or_neg("x") - FLOAT_MISSING).abs() < f64::EPSILON);
    }

    #[test]
    fn key_rows_and_select() {
        let body = json!({"TABLE_p": {"ROW_p": [{"id": 1, "v": "a"}, {"v": "skip"}, {"id": "2"}]}});
        let rows = table_rows("p", &body);
        let keyed = key_rows(rows.iter().copied(), "id");
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(select_row(&rows, "id", "2").unwrap().get("id"), Some(&json!("2")));
        assert!(select_row(&rows, "id", "9").is_none());
        assert!(select_row(&[], "id", "1").is_none());
    }

    #[test]
    fn snake_labels() {
        assert_eq!(snake_label("Ingress RACL"), "ingress_racl");
        assert_eq!(snake_label("WRED/AFD & Tail Drop"), "wred_afd_tail_drop");
        assert_eq!(snake_label(" Egress  PBR "), "egress_pbr");
    }
}
