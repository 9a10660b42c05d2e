#![allow(clippy::unwrap_used)]
// Entity refresh against a mocked NXAPI endpoint.

use std::net::IpAddr;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nxfleet_api::{CookiePolicy, Credentials, NxapiClient, ResultCode, TransportConfig};
use nxfleet_core::Entity;
use nxfleet_core::entity::arp::ArpSummary;
use nxfleet_core::entity::l2::MacCount;

async fn setup() -> (MockServer, NxapiClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}/ins", server.uri())).unwrap();
    let address: IpAddr = "127.0.0.1".parse().unwrap();
    let transport = TransportConfig::default().with_cookie_policy(CookiePolicy::Off);
    let client =
        NxapiClient::with_url(url, address, Credentials::new("admin", "admin"), &transport).unwrap();
    (server, client)
}

fn outputs(output: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ins_api": {"type": "cli_show", "version": "1.0", "sid": "eoc",
            "outputs": {"output": output}}
    }))
}

fn arp_body() -> Value {
    json!({"TABLE_vrf": {"ROW_vrf": {
        "vrf-name-out": "tenant-a", "cnt-resolved": "12", "cnt-incomplete": "1",
        "cnt-thrtl": "0", "cnt-unknown": "0", "cnt-total": "13"
    }}})
}

#[tokio::test]
async fn refresh_loads_single_body() {
    let (server, mut client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/ins"))
        .and(body_partial_json(json!({
            "ins_api": {"input": "show ip arp summary vrf tenant-a"}
        })))
        .respond_with(outputs(json!({"code": "200", "msg": "Success", "body": arp_body()})))
        .expect(1)
        .mount(&server)
        .await;

    let mut arp = ArpSummary::new();
    arp.set_vrf("tenant-a");
    assert_eq!(arp.total(), -1);

    let code = arp.refresh(&mut client).await.unwrap();
    assert_eq!(code, ResultCode::SUCCESS);
    assert_eq!(arp.total(), 13);
    assert_eq!(arp.resolved(), 12);
}

#[tokio::test]
async fn cli_error_leaves_view_empty() {
    let (server, mut client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(outputs(json!({
            "code": "400", "msg": "Input CLI command error", "clierror": "% Invalid command"
        })))
        .mount(&server)
        .await;

    let mut mac = MacCount::new();
    let code = mac.refresh(&mut client).await.unwrap();
    assert_eq!(code, ResultCode::CLI_ERROR);
    assert_eq!(mac.total(), -1);
    assert!(mac.info().is_empty());
}

#[tokio::test]
async fn second_refresh_replaces_previous_view() {
    let (server, mut client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(outputs(json!({"code": "200", "msg": "Success", "body": arp_body()})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(outputs(json!([
            {"code": "200", "msg": "Success", "body": arp_body()},
            {"code": "200", "msg": "Success", "body": arp_body()}
        ])))
        .mount(&server)
        .await;

    let mut arp = ArpSummary::new();
    arp.set_vrf("tenant-a");
    arp.refresh(&mut client).await.unwrap();
    assert_eq!(arp.total(), 13);

    // Two bodies for one CLI: the guard empties the view.
    let code = arp.refresh(&mut client).await.unwrap();
    assert_eq!(code, ResultCode::SUCCESS);
    assert_eq!(arp.total(), -1);
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    let (server, mut client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let mut arp = ArpSummary::new();
    let err = arp.refresh(&mut client).await.unwrap_err();
    assert!(matches!(err, nxfleet_core::CoreError::Device { status: 401, .. }));
}
