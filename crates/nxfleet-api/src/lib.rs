// nxfleet-api: Async Rust client for the Cisco NX-OS NXAPI (ins_api + jsonrpc)

pub mod auth;
pub mod client;
pub mod cookies;
pub mod envelope;
pub mod error;
pub mod result_code;
pub mod transport;
pub mod verify;

pub use auth::{Credentials, EnvelopeKind};
pub use client::{ConfResponse, NxapiClient, ShowResponse};
pub use cookies::{CookiePolicy, CookieStore};
pub use envelope::OneOrMany;
pub use error::Error;
pub use result_code::ResultCode;
pub use transport::{TlsMode, TransportConfig};
