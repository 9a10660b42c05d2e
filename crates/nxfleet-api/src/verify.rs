// Input verifiers
//
// Pure predicates used to gate user-supplied keys (peer address, prefix,
// module, VLAN) before they reach a CLI string or a view lookup. Nothing here
// errors: bad input is simply `false`.

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

static MAC_COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{2}(:[0-9a-fA-F]{2}){5}$").expect("static regex")
});
static MAC_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{2}(-[0-9a-fA-F]{2}){5}$").expect("static regex")
});
static MAC_DOTTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{4}\.[0-9a-fA-F]{4}\.[0-9a-fA-F]{4}$").expect("static regex")
});
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex"));

// ── Addresses ───────────────────────────────────────────────────────

pub fn is_ipv4(x: &str) -> bool {
    x.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(x: &str) -> bool {
    x.parse::<Ipv6Addr>().is_ok()
}

/// Either address family.
pub fn is_ip(x: &str) -> bool {
    x.parse::<IpAddr>().is_ok()
}

/// `a.b.c.d/len` with `len` in `0..=32`. Host bits may be set.
pub fn is_ipv4_prefix(x: &str) -> bool {
    let Some((addr, len)) = x.split_once('/') else {
        return false;
    };
    is_ipv4(addr) && len.parse::<i64>().is_ok_and(is_ipv4_mask_len) && is_digits(len)
}

/// `addr/len` with `len` in `0..=128`. Host bits may be set.
pub fn is_ipv6_prefix(x: &str) -> bool {
    let Some((addr, len)) = x.split_once('/') else {
        return false;
    };
    is_ipv6(addr) && len.parse::<i64>().is_ok_and(is_ipv6_mask_len) && is_digits(len)
}

pub fn is_ipv4_mask_len(n: i64) -> bool {
    (0..=32).contains(&n)
}

pub fn is_ipv6_mask_len(n: i64) -> bool {
    (0..=128).contains(&n)
}

/// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff`, and `aabb.ccdd.eeff`
/// in either case.
pub fn is_mac(x: &str) -> bool {
    MAC_COLON.is_match(x) || MAC_DASH.is_match(x) || MAC_DOTTED.is_match(x)
}

/// Not multicast, loopback, reserved (240/4, which covers broadcast),
/// unspecified, or link-local.
pub fn is_unicast_ipv4(x: &str) -> bool {
    let Ok(addr) = x.parse::<Ipv4Addr>() else {
        return false;
    };
    let reserved = addr.octets()[0] >= 240;
    !(addr.is_multicast()
        || addr.is_loopback()
        || reserved
        || addr.is_unspecified()
        || addr.is_link_local())
}

/// Not multicast, loopback, reserved, unspecified, or link-local. Text that
/// ends in `.0` (an embedded dotted quad network address) is refused too.
pub fn is_unicast_ipv6(x: &str) -> bool {
    if x.ends_with(".0") {
        return false;
    }
    let Ok(addr) = x.parse::<Ipv6Addr>() else {
        return false;
    };
    !(addr.is_multicast()
        || addr.is_loopback()
        || is_reserved_ipv6(addr)
        || addr.is_unspecified()
        || addr.is_unicast_link_local())
}

/// IETF reserved IPv6 blocks: everything outside 2000::/3, fc00::/7,
/// fe80::/10, fec0::/10 and ff00::/8 that is not the IPv4-mapped range.
fn is_reserved_ipv6(addr: Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() || addr.to_ipv4_mapped().is_some() {
        return false;
    }
    let first = addr.segments()[0];
    let global_unicast = (first & 0xe000) == 0x2000;
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    let site_local = (first & 0xffc0) == 0xfec0;
    let multicast = (first & 0xff00) == 0xff00;
    !(global_unicast || unique_local || link_local || site_local || multicast)
}

// ── Numbers from text ───────────────────────────────────────────────

pub fn is_int(x: &str) -> bool {
    x.trim().parse::<i64>().is_ok()
}

pub fn is_bool(x: &str) -> bool {
    matches!(x.trim().to_ascii_lowercase().as_str(), "true" | "false")
}

pub fn is_float(x: &str) -> bool {
    x.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// `true` iff the decimal representation of `x` is one or more ASCII digits.
pub fn is_digits(x: impl Display) -> bool {
    DIGITS.is_match(&x.to_string())
}

/// `true` iff `x == b^k` for some `k >= 0`.
///
/// With `b == 1` only `x == 1` qualifies; with `b == 0`, `0` and `1` do.
pub fn is_power_of(x: u64, b: u64) -> bool {
    match (x, b) {
        (1, _) => true,
        (_, 0 | 1) => x == 0 && b == 0,
        (0, _) => false,
        _ => {
            let mut n = x;
            while n % b == 0 {
                n /= b;
            }
            n == 1
        }
    }
}

// ── Subjects ────────────────────────────────────────────────────────

/// VLAN ID in the usable 1..=4094 range.
pub fn is_vlan(x: &str) -> bool {
    is_digits(x) && x.parse::<u16>().is_ok_and(|v| (1..=4094).contains(&v))
}

/// Linecard / supervisor slot number as NX-OS prints it.
pub fn is_module(x: &str) -> bool {
    is_digits(x) && x.parse::<u16>().is_ok_and(|v| (1..=64).contains(&v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_accepts_the_three_canonical_formats() {
        assert!(is_mac("aa:bb:cc:dd:ee:ff"));
        assert!(is_mac("aa-bb-cc-dd-ee-ff"));
        assert!(is_mac("aabb.ccdd.eeff"));
        assert!(is_mac("AA:BB:CC:DD:EE:FF"));
    }

    #[test]
    fn mac_rejects_everything_else() {
        for bad in [
            "",
            "aa:bb:cc:dd:ee",
            "aa:bb:cc:dd:ee:ff:00",
            "aa:bb-cc:dd:ee:ff",
            "aabbccddeeff",
            "aabb.ccdd.eef",
            "gg:bb:cc:dd:ee:ff",
            "aabb:ccdd:eeff",
            " aa:bb:cc:dd:ee:ff",
        ] {
            assert!(!is_mac(bad), "{bad:?} should not be a MAC");
        }
    }

    #[test]
    fn prefixes() {
        assert!(is_ipv4_prefix("10.231.0.6/31"));
        assert!(is_ipv4_prefix("0.0.0.0/0"));
        assert!(!is_ipv4_prefix("10.0.0.0/33"));
        assert!(!is_ipv4_prefix("10.0.0.0"));
        assert!(!is_ipv4_prefix("10.0.0.0/+8"));
        assert!(is_ipv6_prefix("2001:db8::/32"));
        assert!(!is_ipv6_prefix("2001:db8::/129"));
        assert!(!is_ipv6_prefix("10.0.0.0/8"));
    }

    #[test]
    fn mask_lengths() {
        assert!(is_ipv4_mask_len(0));
        assert!(is_ipv4_mask_len(32));
        assert!(!is_ipv4_mask_len(-1));
        assert!(!is_ipv4_mask_len(33));
        assert!(is_ipv6_mask_len(128));
        assert!(!is_ipv6_mask_len(129));
    }

    #[test]
    fn unicast_ipv4() {
        assert!(is_unicast_ipv4("10.1.1.1"));
        assert!(!is_unicast_ipv4("224.0.0.5"));
        assert!(!is_unicast_ipv4("127.0.0.1"));
        assert!(!is_unicast_ipv4("240.0.0.1"));
        assert!(!is_unicast_ipv4("255.255.255.255"));
        assert!(!is_unicast_ipv4("0.0.0.0"));
        assert!(!is_unicast_ipv4("169.254.1.1"));
        assert!(!is_unicast_ipv4("bad"));
    }

    #[test]
    fn unicast_ipv6() {
        assert!(is_unicast_ipv6("2001:db8::1"));
        assert!(is_unicast_ipv6("fd00::1"));
        assert!(!is_unicast_ipv6("ff02::1"));
        assert!(!is_unicast_ipv6("::1"));
        assert!(!is_unicast_ipv6("::"));
        assert!(!is_unicast_ipv6("fe80::1"));
        assert!(!is_unicast_ipv6("100::1"));
        assert!(!is_unicast_ipv6("::ffff:10.0.0.0"));
    }

    #[test]
    fn numeric_text() {
        assert!(is_int("-12"));
        assert!(!is_int("1.5"));
        assert!(is_float("1.5"));
        assert!(!is_float("inf"));
        assert!(is_bool("True"));
        assert!(!is_bool("yes"));
        assert!(is_digits(42));
        assert!(is_digits("007"));
        assert!(!is_digits(-1));
        assert!(!is_digits(""));
    }

    #[test]
    fn powers() {
        assert!(is_power_of(1, 2));
        assert!(is_power_of(8, 2));
        assert!(is_power_of(81, 3));
        assert!(!is_power_of(12, 2));
        assert!(!is_power_of(0, 2));
        assert!(is_power_of(1, 1));
        assert!(!is_power_of(5, 1));
        assert!(is_power_of(0, 0));
    }

    #[test]
    fn subjects() {
        assert!(is_vlan("1"));
        assert!(is_vlan("4094"));
        assert!(!is_vlan("4095"));
        assert!(!is_vlan("0"));
        assert!(is_module("27"));
        assert!(!is_module("0"));
        assert!(!is_module("x"));
    }
}
