#![allow(clippy::unwrap_used)]
// Integration tests for OltSession workflows against a mocked device.

use std::io::Write;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ponctl_api::RestconfClient;
use ponctl_core::{
    CoreError, OltPort, OltSession, SerialNumber, ServiceProfileEntry, VlanProfileEntry,
    allowlist,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, OltSession) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RestconfClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("session=em+protection-user=admin&em+protection-pw=admin"),
    );
    (server, OltSession::with_client(client))
}

fn sn(raw: &str) -> SerialNumber {
    SerialNumber::parse(raw).unwrap()
}

fn port(raw: &str) -> OltPort {
    OltPort::parse(raw).unwrap()
}

/// Wrap table rows in the device's MIB envelope.
fn envelope(table: &str, entry: &str, rows: serde_json::Value) -> serde_json::Value {
    json!({
        "ISKRATEL-MSAN-MIB:": {
            "ISKRATEL-MSAN-MIB": { table: { entry: rows } }
        }
    })
}

fn onu_cfg_row(interface: &str, serial: &str) -> serde_json::Value {
    json!({
        "msanOnuCfgIfName": interface,
        "msanOnuCfgSerialNumber": serial,
        "msanOnuCfgAdminState": 1
    })
}

/// Mount the two tables `sync()` reads.
async fn mount_device_tables(
    server: &MockServer,
    configs: serde_json::Value,
    bindings: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path_regex(r"msanOnuCfgTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "msanOnuCfgTable",
            "msanOnuCfgEntry",
            configs,
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"msanServicePortProfileTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "msanServicePortProfileTable",
            "msanServicePortProfileEntry",
            bindings,
        )))
        .mount(server)
        .await;
}

// ── Sync ────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_discovers_device_registrations() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([
            onu_cfg_row("0/1/1", "ISKT00000001"),
            onu_cfg_row("0/1/2", "ISKT00000002"),
            onu_cfg_row("0/1/3", ""),
        ]),
        json!([
            { "ifName": "0/1/1", "msanServiceProfileName": "HSI" },
            { "ifName": "0/1/1", "msanServiceProfileName": "IPTV" },
        ]),
    )
    .await;

    let report = session.sync().await.unwrap();
    assert_eq!(report.discovered, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.pruned, 0);

    let registry = session.registry();
    assert_eq!(registry.len(), 2);
    let first = registry.find_by_serial(&sn("ISKT00000001")).unwrap();
    assert_eq!(first.interface.unwrap().to_string(), "0/1/1");
    assert_eq!(first.services, ["HSI".to_owned(), "IPTV".to_owned()]);
    let second = registry.find_by_serial(&sn("ISKT00000002")).unwrap();
    assert!(second.services.is_empty());
}

#[tokio::test]
async fn sync_twice_is_idempotent() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([
            onu_cfg_row("0/1/1", "ISKT00000001"),
            onu_cfg_row("0/2/4", "ISKT00000002"),
        ]),
        json!([
            { "ifName": "0/2/4", "msanServiceProfileName": "VOIP" },
        ]),
    )
    .await;

    session.sync().await.unwrap();
    let first = serde_json::to_vec(&session.registry().snapshot()).unwrap();

    let report = session.sync().await.unwrap();
    assert_eq!(report.discovered, 0);
    assert_eq!(report.updated, 2);
    let second = serde_json::to_vec(&session.registry().snapshot()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn sync_prunes_pending_entries_missing_from_the_device() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([onu_cfg_row("0/1/1", "ISKT00000001")]),
        json!([]),
    )
    .await;

    session
        .load_allow_list("ISKT0000FEED HSI\n".as_bytes())
        .unwrap();
    assert_eq!(session.registry().len(), 1);

    let report = session.sync().await.unwrap();
    assert_eq!(report.discovered, 1);
    assert_eq!(report.pruned, 1);
    assert!(!session.registry().contains(&sn("ISKT0000FEED")));
    assert!(session.registry().contains(&sn("ISKT00000001")));
}

// ── Authorize ───────────────────────────────────────────────────────

#[tokio::test]
async fn authorize_unknown_serial_issues_no_remote_write() {
    let (server, mut session) = setup().await;

    let err = session
        .authorize(&sn("UNKNOWNSN001"), Some(port("0/1")))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthorized { .. }));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "expected no HTTP traffic");
}

#[tokio::test]
async fn authorize_allocates_the_first_free_subinterface() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([
            onu_cfg_row("0/2/1", "ISKT00000001"),
            onu_cfg_row("0/2/3", "ISKT00000003"),
            onu_cfg_row("0/2/4", "ISKT00000004"),
        ]),
        json!([]),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    session.sync().await.unwrap();
    session
        .load_allow_list("ISKT0000BEEF\n".as_bytes())
        .unwrap();

    let interface = session
        .authorize(&sn("ISKT0000BEEF"), Some(port("0/2")))
        .await
        .unwrap();
    assert_eq!(interface.to_string(), "0/2/2");

    let registration = session.registry().find_by_serial(&sn("ISKT0000BEEF")).unwrap();
    assert_eq!(registration.interface.unwrap().to_string(), "0/2/2");

    // The provisioning PATCH addressed the percent-encoded interface key.
    let patch = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PATCH")
        .unwrap();
    assert!(patch.url.as_str().ends_with("msanOnuCfgEntry=0%2F2%2F2"));
}

#[tokio::test]
async fn rejected_authorize_leaves_the_registry_unchanged() {
    let (server, mut session) = setup().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    session
        .load_allow_list("ISKT0000BEEF\n".as_bytes())
        .unwrap();

    let err = session
        .authorize(&sn("ISKT0000BEEF"), Some(port("0/1")))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { status: 500, .. }));

    let registration = session.registry().find_by_serial(&sn("ISKT0000BEEF")).unwrap();
    assert!(registration.interface.is_none(), "no partial commit");
}

#[tokio::test]
async fn authorize_without_interface_or_hint_fails_fast() {
    let (server, mut session) = setup().await;
    session
        .load_allow_list("ISKT0000BEEF\n".as_bytes())
        .unwrap();

    let err = session.authorize(&sn("ISKT0000BEEF"), None).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Deauthorize ─────────────────────────────────────────────────────

#[tokio::test]
async fn deauthorize_blanks_then_removes() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([onu_cfg_row("0/1/1", "ISKT00000001")]),
        json!([]),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    session.sync().await.unwrap();
    session.deauthorize(&sn("ISKT00000001")).await.unwrap();
    assert!(session.registry().is_empty());

    let patch = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method.as_str() == "PATCH")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&patch.body).unwrap();
    assert_eq!(body["msanOnuCfgIfName"], "0/1/1");
    assert_eq!(body["msanOnuCfgSerialNumber"], "");
}

#[tokio::test]
async fn rejected_deauthorize_keeps_the_registration() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([onu_cfg_row("0/1/1", "ISKT00000001")]),
        json!([]),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;

    session.sync().await.unwrap();
    let err = session.deauthorize(&sn("ISKT00000001")).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { status: 409, .. }));
    assert!(session.registry().contains(&sn("ISKT00000001")));
}

#[tokio::test]
async fn deny_list_batch_continues_past_failures() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([
            onu_cfg_row("0/1/1", "ISKT00000001"),
            onu_cfg_row("0/1/2", "ISKT00000002"),
        ]),
        json!([]),
    )
    .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    session.sync().await.unwrap();

    // 2 known serials, 1 well-formed-but-unknown, 1 malformed line.
    let mut deny = tempfile::NamedTempFile::new().unwrap();
    writeln!(deny, "ISKT00000001").unwrap();
    writeln!(deny, "bogus").unwrap();
    writeln!(deny, "ISKT0000DEAD").unwrap();
    writeln!(deny, "ISKT00000002").unwrap();
    deny.flush().unwrap();

    let file = std::fs::File::open(deny.path()).unwrap();
    let serials = allowlist::parse_deny_list(std::io::BufReader::new(file)).unwrap();
    assert_eq!(serials.len(), 3);

    let success = session.deauthorize_many(&serials).await;
    assert_eq!(success, 2);
    assert!(session.registry().is_empty());
}

// ── Profile surface ─────────────────────────────────────────────────

fn service_profile_rows() -> serde_json::Value {
    envelope(
        "msanServiceProfileTable",
        "msanServiceProfileEntry",
        json!([
            { "msanServiceProfileName": "HSI", "msanServiceProfileUsage": 1 },
            { "msanServiceProfileName": "LAB", "msanServiceProfileUsage": 2 },
        ]),
    )
}

#[tokio::test]
async fn profile_lookup_and_miss() {
    let (server, session) = setup().await;
    Mock::given(method("GET"))
        .and(path_regex(r"msanServiceProfileTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_profile_rows()))
        .mount(&server)
        .await;

    let profile: ServiceProfileEntry = session.profile_by_name("HSI").await.unwrap();
    assert_eq!(profile.usage, 1);

    let err = session
        .profile_by_name::<ServiceProfileEntry>("NOPE")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn delete_profile_refuses_in_use_entries() {
    let (server, session) = setup().await;
    Mock::given(method("GET"))
        .and(path_regex(r"msanServiceProfileTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_profile_rows()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = session
        .delete_profile::<ServiceProfileEntry>("HSI")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ProfileInUse { .. }));

    session.delete_profile::<ServiceProfileEntry>("LAB").await.unwrap();
}

#[tokio::test]
async fn create_profile_refuses_duplicates() {
    let (server, session) = setup().await;
    Mock::given(method("GET"))
        .and(path_regex(r"msanVlanProfileTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "msanVlanProfileTable",
            "msanVlanProfileEntry",
            json!([{ "msanVlanProfileName": "V100" }]),
        )))
        .mount(&server)
        .await;

    let duplicate = VlanProfileEntry::new("V100");
    let err = session.create_profile(&duplicate).await.unwrap_err();
    assert!(matches!(err, CoreError::AlreadyExists { .. }));
}

// ── Service binding ─────────────────────────────────────────────────

#[tokio::test]
async fn add_services_checks_existence_before_binding() {
    let (server, mut session) = setup().await;
    mount_device_tables(
        &server,
        json!([onu_cfg_row("0/1/1", "ISKT00000001")]),
        json!([]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path_regex(r"msanServiceProfileTable$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_profile_rows()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    session.sync().await.unwrap();

    let err = session
        .add_services(&sn("ISKT00000001"), &["MISSING".to_owned()])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    // Existence check failed before any binding write.
    let posts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 0);

    session
        .add_services(&sn("ISKT00000001"), &["HSI".to_owned()])
        .await
        .unwrap();
    let registration = session.registry().find_by_serial(&sn("ISKT00000001")).unwrap();
    assert_eq!(registration.services, ["HSI".to_owned()]);
}
