#![allow(clippy::unwrap_used)]
// Integration tests for `RestconfClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ponctl_api::RestconfClient;
use ponctl_api::error::Error;
use ponctl_api::restconf::models::{BlacklistEntry, OnuConfigEntry, ServicePortEntry};

// ── Helpers ─────────────────────────────────────────────────────────

const MIB_ROOT: &str = "/restconf/data/ISKRATEL-MSAN-MIB:ISKRATEL-MSAN-MIB";

async fn setup() -> (MockServer, RestconfClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RestconfClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("session=em+protection-user=admin&em+protection-pw=admin"),
    );
    (server, client)
}

/// The full MIB nesting the device wraps table reads in.
fn mib_envelope(table: &str, entry: &str, rows: serde_json::Value) -> serde_json::Value {
    json!({
        "ISKRATEL-MSAN-MIB:": {
            "ISKRATEL-MSAN-MIB": {
                table: { entry: rows }
            }
        }
    })
}

// ── Table reads ─────────────────────────────────────────────────────

#[tokio::test]
async fn get_table_unwraps_the_mib_envelope() {
    let (server, client) = setup().await;

    let body = mib_envelope(
        "msanOnuCfgTable",
        "msanOnuCfgEntry",
        json!([{
            "msanOnuCfgIfName": "0/1/1",
            "msanOnuCfgSerialNumber": "ISKT00000001",
            "msanOnuCfgAdminState": 1
        }]),
    );

    Mock::given(method("GET"))
        .and(path_regex(r"msanOnuCfgTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let entries: Vec<OnuConfigEntry> = client.get_table().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].if_name, "0/1/1");
    assert_eq!(entries[0].serial_number, "ISKT00000001");
    assert!(entries[0].is_provisioned());
}

#[tokio::test]
async fn get_table_accepts_a_direct_subtree_reply() {
    let (server, client) = setup().await;

    let body = json!({
        "msanOnuBlackListTable": {
            "msanOnuBlackListEntry": [{
                "msanOnuBlackListIfName": "0/4",
                "msanOnuBlackListSerialNumber": "ISKT00000009",
                "msanOnuBlackListCause": 2
            }]
        }
    });

    Mock::given(method("GET"))
        .and(path_regex(r"msanOnuBlackListTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let entries: Vec<BlacklistEntry> = client.get_table().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].cause_label(), "SN Not Known");
}

#[tokio::test]
async fn get_table_treats_a_missing_table_as_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let entries: Vec<BlacklistEntry> = client.get_table().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn get_table_surfaces_malformed_bodies() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let result: Result<Vec<OnuConfigEntry>, _> = client.get_table().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn get_table_maps_error_statuses() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let result: Result<Vec<OnuConfigEntry>, _> = client.get_table().await;
    assert!(matches!(result, Err(Error::Status { status: 503, .. })));
}

// ── Entry writes ────────────────────────────────────────────────────

#[tokio::test]
async fn patch_entry_percent_encodes_interface_keys() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let entry = OnuConfigEntry::provision("ISKT00000001", "0/5/3");
    client.patch_entry("0/5/3", &entry).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent = requests[0].url.as_str();
    assert!(
        sent.ends_with(&format!("{MIB_ROOT}/msanOnuCfgTable/msanOnuCfgEntry=0%2F5%2F3")),
        "unexpected request URL: {sent}"
    );
}

#[tokio::test]
async fn writes_carry_the_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let entry = ServicePortEntry::new("0/5/3", "102_DATA_Acc");
    client.post_entry("0/5/3", &entry).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let cookie = requests[0].headers.get("cookie").unwrap();
    assert_eq!(
        cookie.to_str().unwrap(),
        "session=em+protection-user=admin&em+protection-pw=admin"
    );
}

#[tokio::test]
async fn non_success_write_status_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    let entry = OnuConfigEntry::blank("0/5/3");
    let result = client.patch_entry("0/5/3", &entry).await;
    assert!(matches!(result, Err(Error::Status { status: 409, .. })));
}

#[tokio::test]
async fn delete_entry_supports_composite_keys() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .delete_entry::<ServicePortEntry>("0/5/3,102_DATA_Acc")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent = requests[0].url.as_str();
    assert!(
        sent.ends_with("msanServicePortProfileEntry=0%2F5%2F3,102_DATA_Acc"),
        "unexpected request URL: {sent}"
    );
}
