// NXAPI result codes
//
// The device reports an HTTP-like integer per output. The client adds its own
// synthetic codes for envelope anomalies so every response carries exactly one
// integer, whatever went wrong. Synthetic codes live above 1000 so they can
// never collide with anything NX-OS emits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A device-reported or client-assigned NXAPI result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(pub i64);

impl ResultCode {
    // ── Device-reported ──────────────────────────────────────────────
    pub const SUCCESS: Self = Self(200);
    pub const CLI_ERROR: Self = Self(400);
    pub const REQUEST_TOO_LARGE: Self = Self(413);
    pub const INTERNAL_ERROR: Self = Self(500);
    pub const STRUCTURED_OUTPUT_UNSUPPORTED: Self = Self(501);

    // ── Client-assigned ──────────────────────────────────────────────
    pub const SUCCESS_EMPTY_OUTPUT: Self = Self(1001);
    pub const JSONRPC_HAS_NO_CODE: Self = Self(1002);
    pub const RESULT_KEY_NOT_PRESENT: Self = Self(1003);
    pub const BODY_KEY_NOT_PRESENT: Self = Self(1004);
    pub const OUTPUTS_KEY_NOT_PRESENT: Self = Self(1005);
    pub const INS_API_KEY_NOT_PRESENT: Self = Self(1006);
    pub const RESULT_IS_NONE: Self = Self(1007);
    pub const CODE_NOT_INTEGER: Self = Self(1008);
    pub const CODE_NOT_RETURNED: Self = Self(1009);

    /// Every code in the taxonomy, device codes first.
    pub const ALL: [Self; 14] = [
        Self::SUCCESS,
        Self::CLI_ERROR,
        Self::REQUEST_TOO_LARGE,
        Self::INTERNAL_ERROR,
        Self::STRUCTURED_OUTPUT_UNSUPPORTED,
        Self::SUCCESS_EMPTY_OUTPUT,
        Self::JSONRPC_HAS_NO_CODE,
        Self::RESULT_KEY_NOT_PRESENT,
        Self::BODY_KEY_NOT_PRESENT,
        Self::OUTPUTS_KEY_NOT_PRESENT,
        Self::INS_API_KEY_NOT_PRESENT,
        Self::RESULT_IS_NONE,
        Self::CODE_NOT_INTEGER,
        Self::CODE_NOT_RETURNED,
    ];

    /// Fixed human description for this code.
    pub fn description(self) -> &'static str {
        match self {
            Self::SUCCESS => "Success",
            Self::CLI_ERROR => "CLI execution error",
            Self::REQUEST_TOO_LARGE => "Request too large",
            Self::INTERNAL_ERROR => "Internal server error",
            Self::STRUCTURED_OUTPUT_UNSUPPORTED => "Structured output not supported",
            Self::SUCCESS_EMPTY_OUTPUT => "Success, with empty output",
            Self::JSONRPC_HAS_NO_CODE => "JSON-RPC responses carry no result code",
            Self::RESULT_KEY_NOT_PRESENT => "result key not present in response",
            Self::BODY_KEY_NOT_PRESENT => "body key not present in response",
            Self::OUTPUTS_KEY_NOT_PRESENT => "outputs key not present in response",
            Self::INS_API_KEY_NOT_PRESENT => "ins_api key not present in response",
            Self::RESULT_IS_NONE => "result is null",
            Self::CODE_NOT_INTEGER => "code returned by device is not an integer",
            Self::CODE_NOT_RETURNED => "device did not return a code",
            _ => "Unknown result code",
        }
    }

    /// `true` for the two codes that mean the body can be trusted.
    pub fn is_success(self) -> bool {
        matches!(self, Self::SUCCESS | Self::SUCCESS_EMPTY_OUTPUT)
    }

    /// `true` for codes the client invented rather than read from the device.
    pub fn is_synthetic(self) -> bool {
        self.0 > 1000
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ResultCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_fixed_description() {
        for code in ResultCode::ALL {
            assert_ne!(code.description(), "Unknown result code", "{code}");
        }
        assert_eq!(ResultCode(404).description(), "Unknown result code");
    }

    #[test]
    fn success_codes() {
        assert!(ResultCode::SUCCESS.is_success());
        assert!(ResultCode::SUCCESS_EMPTY_OUTPUT.is_success());
        assert!(!ResultCode::CLI_ERROR.is_success());
        assert!(!ResultCode::RESULT_IS_NONE.is_success());
    }

    #[test]
    fn synthetic_codes_do_not_overlap_device_codes() {
        let device: Vec<_> = ResultCode::ALL.iter().filter(|c| !c.is_synthetic()).collect();
        assert_eq!(device.len(), 5);
        assert!(ResultCode::CODE_NOT_RETURNED.is_synthetic());
    }
}
