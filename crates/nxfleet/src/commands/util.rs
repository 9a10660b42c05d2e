//! Shared helpers for command handlers.

use nxfleet_core::Family;

use crate::cli::MaskRange;
use crate::error::CliError;

/// Reject `value` for `--field` unless `valid` holds.
pub fn check(field: &str, value: &str, valid: impl FnOnce(&str) -> bool) -> Result<(), CliError> {
    if valid(value) {
        Ok(())
    } else {
        Err(CliError::validation(field, format!("'{value}' is not valid")))
    }
}

/// [`check`] for optional flags; absent passes.
pub fn check_opt(
    field: &str,
    value: Option<&str>,
    valid: impl FnOnce(&str) -> bool,
) -> Result<(), CliError> {
    value.map_or(Ok(()), |v| check(field, v, valid))
}

/// Resolve `--ge`/`--le` to an inclusive mask-length window for `family`.
pub fn mask_window(range: &MaskRange, family: Family) -> Result<(i64, i64), CliError> {
    let max = match family {
        Family::Ipv4 => 32,
        Family::Ipv6 => 128,
    };
    let ge = range.ge.unwrap_or(0);
    let le = range.le.unwrap_or(max);
    for (field, n) in [("ge", ge), ("le", le)] {
        if !family.is_mask_len(n) {
            return Err(CliError::validation(field, format!("{n} is not a mask length")));
        }
    }
    if ge > le {
        return Err(CliError::validation("ge", format!("{ge} is greater than --le {le}")));
    }
    Ok((ge, le))
}

/// Snapshot an entity's keys so its subject can be moved while iterating.
pub fn owned<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    keys.map(str::to_owned).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nxfleet_api::verify;

    use super::*;

    #[test]
    fn check_reports_field() {
        assert!(check("vlan", "10", verify::is_vlan).is_ok());
        let err = check("vlan", "5000", verify::is_vlan).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for --vlan: '5000' is not valid");
        assert!(check_opt("vlan", None, verify::is_vlan).is_ok());
    }

    #[test]
    fn mask_window_defaults_to_family_bounds() {
        let open = MaskRange { ge: None, le: None };
        assert_eq!(mask_window(&open, Family::Ipv4).ok(), Some((0, 32)));
        assert_eq!(mask_window(&open, Family::Ipv6).ok(), Some((0, 128)));
    }

    #[test]
    fn mask_window_rejects_bad_bounds() {
        let inverted = MaskRange { ge: Some(24), le: Some(16) };
        assert!(mask_window(&inverted, Family::Ipv4).is_err());
        let too_long = MaskRange { ge: None, le: Some(64) };
        assert!(mask_window(&too_long, Family::Ipv4).is_err());
        assert!(mask_window(&too_long, Family::Ipv6).is_ok());
    }
}
