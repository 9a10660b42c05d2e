// NX-OS duration strings -> seconds
//
// Different CLIs print elapsed time in different dialects: `00:01:23` for
// BGP last-read, `4w2d` / `1d02h` for uptimes, ISO-8601 `P1DT2H` in a few
// newer outputs, and `1week(s) 2day(s)` for interface flap timers. Anything
// unrecognized maps to `-1.0` so callers can print it as a sentinel.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::normalize::FLOAT_MISSING;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

static SECONDS_FRACTION: LazyLock<Regex> = LazyLock::new(|| re(r"^(\d+)\.(\d+)$"));
static HMS: LazyLock<Regex> = LazyLock::new(|| re(r"^(\d+):(\d{1,2}):(\d{1,2})$"));
static DAYS_HOURS: LazyLock<Regex> = LazyLock::new(|| re(r"^(\d+)d(\d+)h$"));
static WEEKS_DAYS: LazyLock<Regex> = LazyLock::new(|| re(r"^(\d+)w(\d+)d$"));
static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
});
static WEEKS_DAYS_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^(\d+)\s*weeks?(?:\(s\))?\s+(\d+)\s*days?(?:\(s\))?$")
});
static INTEGER: LazyLock<Regex> = LazyLock::new(|| re(r"^\d+$"));

fn num(caps: &Captures<'_>, i: usize) -> f64 {
    caps.get(i)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Parse an NX-OS duration into seconds, or `-1.0` if the text is not one.
pub fn parse_timer(text: &str) -> f64 {
    let text = text.trim();

    if let Some(c) = SECONDS_FRACTION.captures(text) {
        let frac = format!("0.{}", &c[2]).parse::<f64>().unwrap_or(0.0);
        return num(&c, 1) + frac;
    }
    if let Some(c) = HMS.captures(text) {
        return num(&c, 1) * HOUR + num(&c, 2) * MINUTE + num(&c, 3);
    }
    if let Some(c) = DAYS_HOURS.captures(text) {
        return num(&c, 1) * DAY + num(&c, 2) * HOUR;
    }
    if let Some(c) = WEEKS_DAYS.captures(text) {
        return num(&c, 1) * WEEK + num(&c, 2) * DAY;
    }
    if text.len() > 1 && text != "PT" {
        if let Some(c) = ISO_8601.captures(text) {
            return num(&c, 1) * YEAR
                + num(&c, 2) * MONTH
                + num(&c, 3) * WEEK
                + num(&c, 4) * DAY
                + num(&c, 5) * HOUR
                + num(&c, 6) * MINUTE
                + num(&c, 7);
        }
    }

    let lower = text.to_ascii_lowercase();
    if let Some(c) = WEEKS_DAYS_WORDS.captures(&lower) {
        return num(&c, 1) * WEEK + num(&c, 2) * DAY;
    }
    if lower == "never" {
        return FLOAT_MISSING;
    }
    if INTEGER.is_match(text) {
        return text.parse::<f64>().unwrap_or(FLOAT_MISSING);
    }
    FLOAT_MISSING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::float_cmp)]
    fn check(text: &str, secs: f64) {
        assert_eq!(parse_timer(text), secs, "{text:?}");
    }

    #[test]
    fn canonical_forms() {
        check("PT1H", 3600.0);
        check("1d0h", 86_400.0);
        check("1w0d", 604_800.0);
        check("1:00:00", 3600.0);
        check("3600.0", 3600.0);
    }

    #[test]
    fn other_dialects() {
        check("00:01:23", 83.0);
        check("2d03h", 2.0 * 86_400.0 + 3.0 * 3600.0);
        check("4w2d", 4.0 * 604_800.0 + 2.0 * 86_400.0);
        check("P1DT2H3M4S", 86_400.0 + 7200.0 + 180.0 + 4.0);
        check("P2W", 2.0 * 604_800.0);
        check("PT0.5S", 0.5);
        check("1week(s) 2day(s)", 604_800.0 + 2.0 * 86_400.0);
        check("3 weeks 1 day", 3.0 * 604_800.0 + 86_400.0);
        check("42", 42.0);
        check("  1:00:00 ", 3600.0);
        check("12.250", 12.25);
    }

    #[test]
    fn unrecognized_is_sentinel() {
        check("never", -1.0);
        check("Never", -1.0);
        check("", -1.0);
        check("P", -1.0);
        check("PT", -1.0);
        check("yesterday", -1.0);
        check("1h2d", -1.0);
    }

    #[test]
    fn idempotent() {
        for s in ["PT1H", "1d0h", "garbage"] {
            assert_eq!(parse_timer(s).to_bits(), parse_timer(s).to_bits());
        }
    }
}
