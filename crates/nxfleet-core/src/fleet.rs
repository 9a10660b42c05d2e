// ── Fleet dispatch ──
//
// One logical query fanned out to many switches. Each device gets its own
// session and its own worker future; the dispatcher waits for all of them and
// emits their lines in input order, never interleaved. A failing device
// becomes a single `<device>: error: ...` line and never aborts its siblings.

use std::future::Future;
use std::net::IpAddr;

use futures_util::StreamExt;
use futures_util::stream;
use nxfleet_api::{Credentials, NxapiClient, TransportConfig};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Maps an inventory name to the switch's management address.
pub trait InventoryResolver: Send + Sync {
    fn resolve_mgmt_ip(
        &self,
        device: &str,
    ) -> impl Future<Output = Result<IpAddr, CoreError>> + Send;
}

/// Supplies login credentials for a device.
pub trait CredentialSource: Send + Sync {
    fn fetch(&self, device: &str) -> Result<Credentials, CoreError>;
}

/// An open NXAPI session bound to one inventory name.
#[derive(Debug)]
pub struct DeviceSession {
    pub device: String,
    pub client: NxapiClient,
}

/// Run `f` over `items` with at most `limit` futures in flight, returning
/// results in input order.
pub async fn fan_out<I, F, Fut>(items: I, limit: usize, f: F) -> Vec<Fut::Output>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future,
{
    stream::iter(items).map(f).buffered(limit.max(1)).collect().await
}

/// Per-run dispatch context: how to find, authenticate and reach devices.
pub struct Fleet<R, C> {
    resolver: R,
    credentials: C,
    transport: TransportConfig,
    max_parallel: usize,
}

impl<R: InventoryResolver, C: CredentialSource> Fleet<R, C> {
    pub fn new(resolver: R, credentials: C, transport: TransportConfig) -> Self {
        Self {
            resolver,
            credentials,
            transport,
            max_parallel: 0,
        }
    }

    /// Cap concurrent workers; `0` runs one worker per device at once.
    #[must_use]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    fn limit(&self, devices: usize) -> usize {
        match self.max_parallel {
            0 => devices.max(1),
            n => n,
        }
    }

    /// Resolve, authenticate and open a session for one device.
    pub async fn connect(&self, device: &str) -> Result<DeviceSession, CoreError> {
        let address = self.resolver.resolve_mgmt_ip(device).await?;
        let credentials = self.credentials.fetch(device)?;
        debug!(device, %address, username = %credentials.username, "opening session");
        let client = NxapiClient::new(address, credentials, &self.transport)?;
        Ok(DeviceSession {
            device: device.to_owned(),
            client,
        })
    }

    /// Run `worker` once per device and gather every line it produced, in
    /// the order the devices were given.
    pub async fn dispatch<S, W, Fut>(&self, devices: &[S], worker: W) -> Vec<String>
    where
        S: AsRef<str>,
        W: Fn(DeviceSession) -> Fut,
        Fut: Future<Output = Result<Vec<String>, CoreError>>,
    {
        let worker = &worker;
        let per_device = fan_out(devices, self.limit(devices.len()), |device| async move {
            let device = device.as_ref();
            let result = match self.connect(device).await {
                Ok(session) => worker(session).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(device, error = %e, "worker failed");
                    vec![format!("{device}: error: {e}")]
                }
            }
        })
        .await;
        per_device.into_iter().flatten().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::Ipv4Addr;
    use std::time::Duration;

    use nxfleet_api::CookiePolicy;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Loopback;

    impl InventoryResolver for Loopback {
        async fn resolve_mgmt_ip(&self, device: &str) -> Result<IpAddr, CoreError> {
            if device.starts_with("unknown") {
                return Err(CoreError::Inventory {
                    device: device.to_owned(),
                    reason: "not in inventory".into(),
                });
            }
            Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
        }
    }

    struct Fixed;

    impl CredentialSource for Fixed {
        fn fetch(&self, _device: &str) -> Result<Credentials, CoreError> {
            Ok(Credentials::new("admin", "admin"))
        }
    }

    fn fleet() -> Fleet<Loopback, Fixed> {
        let transport = TransportConfig::default().with_cookie_policy(CookiePolicy::Off);
        Fleet::new(Loopback, Fixed, transport)
    }

    async fn lines(session: DeviceSession) -> Result<Vec<String>, CoreError> {
        match session.device.as_str() {
            "A" => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(vec!["A1".into(), "A2".into()])
            }
            "B" => Ok(vec!["B1".into()]),
            "empty" => Ok(Vec::new()),
            other => Err(CoreError::Internal(format!("unexpected {other}"))),
        }
    }

    #[tokio::test]
    async fn output_follows_input_order() {
        let out = fleet().dispatch(&["A", "B"], lines).await;
        assert_eq!(out, vec!["A1", "A2", "B1"]);
    }

    #[tokio::test]
    async fn empty_device_adds_no_lines() {
        let out = fleet().dispatch(&["A", "B", "empty"], lines).await;
        assert_eq!(out, vec!["A1", "A2", "B1"]);
    }

    #[tokio::test]
    async fn bounded_parallelism_keeps_order() {
        let out = fleet()
            .with_max_parallel(1)
            .dispatch(&["B", "A", "empty"], lines)
            .await;
        assert_eq!(out, vec!["B1", "A1", "A2"]);
    }

    #[tokio::test]
    async fn failures_become_lines() {
        let out = fleet().dispatch(&["unknown1", "A", "C"], lines).await;
        assert_eq!(out.len(), 4);
        assert!(out[0].starts_with("unknown1: error: Cannot resolve"));
        assert_eq!(&out[1..3], ["A1", "A2"]);
        assert_eq!(out[3], "C: error: Internal error: unexpected C");
    }

    #[tokio::test]
    async fn fan_out_preserves_order() {
        let out = fan_out([30_u64, 0, 10], 3, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            ms
        })
        .await;
        assert_eq!(out, vec![30, 0, 10]);
    }
}
