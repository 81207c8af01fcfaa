#![allow(clippy::unwrap_used)]
// Integration tests for `VmRestClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vmdash_api::{Error, VmRestClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, VmRestClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = VmRestClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── VM collection ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_vms() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "M5GFQ2BE1DCM", "path": "/vms/debian/debian.vmx" },
            { "id": "8PQ9C04R7F2J", "path": "/vms/win11/win11.vmx" }
        ])))
        .mount(&server)
        .await;

    let vms = client.list_vms().await.unwrap();

    assert_eq!(vms.len(), 2);
    assert_eq!(vms[0].id, "M5GFQ2BE1DCM");
    assert_eq!(vms[1].path, "/vms/win11/win11.vmx");
}

#[tokio::test]
async fn test_get_vm_with_structured_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "M5GFQ2BE1DCM",
            "cpu": { "processors": 4 },
            "memory": 2048
        })))
        .mount(&server)
        .await;

    let vm = client.get_vm("M5GFQ2BE1DCM").await.unwrap();

    assert_eq!(vm.cpu.unwrap().processors(), 4);
    assert_eq!(vm.memory.unwrap().megabytes(), 2048);
}

#[tokio::test]
async fn test_clone_vm_sends_parent_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/vms"))
        .and(body_string(r#"{"name":"debian-copy","parentId":"M5GFQ2BE1DCM"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "NEWCLONE0001",
            "cpu": { "processors": 2 },
            "memory": { "size": 1024 }
        })))
        .mount(&server)
        .await;

    let cloned = client
        .clone_vm(&vmdash_api::types::CloneParams {
            name: "debian-copy".into(),
            parent_id: "M5GFQ2BE1DCM".into(),
        })
        .await
        .unwrap();

    assert_eq!(cloned.id, "NEWCLONE0001");
}

// ── Power ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_power_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/power"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "power_state": "poweredOn" })),
        )
        .mount(&server)
        .await;

    let state = client.get_power_state("M5GFQ2BE1DCM").await.unwrap();
    assert_eq!(state.power_state, "poweredOn");
}

#[tokio::test]
async fn test_set_power_state_sends_bare_operation() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/vms/M5GFQ2BE1DCM/power"))
        .and(body_string("on"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "power_state": "poweredOn" })),
        )
        .mount(&server)
        .await;

    let state = client.set_power_state("M5GFQ2BE1DCM", "on").await.unwrap();
    assert_eq!(state.power_state, "poweredOn");
}

#[tokio::test]
async fn test_set_power_state_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/vms/M5GFQ2BE1DCM/power"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": 100,
            "message": "The operation is not allowed in the current state"
        })))
        .mount(&server)
        .await;

    let err = client
        .set_power_state("M5GFQ2BE1DCM", "pause")
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.status(), Some(409));
}

// ── Guest IP ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_ip_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "192.168.12.34" })))
        .mount(&server)
        .await;

    let resp = client.get_ip("M5GFQ2BE1DCM").await.unwrap();
    assert_eq!(resp.ip.as_deref(), Some("192.168.12.34"));
}

#[tokio::test]
async fn test_get_ip_powered_off_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/ip"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "Code": 106,
            "Message": "The virtual machine is not powered on"
        })))
        .mount(&server)
        .await;

    let err = client.get_ip("M5GFQ2BE1DCM").await.unwrap_err();

    assert_eq!(err.api_code(), Some(106));
    match err {
        Error::Api { ref message, .. } => {
            assert!(message.contains("not powered on"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_ip_no_address_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/ip"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 118,
            "message": "Unable to get the IP address"
        })))
        .mount(&server)
        .await;

    let err = client.get_ip("M5GFQ2BE1DCM").await.unwrap_err();
    assert_eq!(err.api_code(), Some(118));
}

#[tokio::test]
async fn test_get_nic_ips_array_shape() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/nicips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nics": [
                { "macAddress": "00:0c:29:aa:bb:cc", "ip": ["10.0.0.5/24", "fe80::1/64"] }
            ]
        })))
        .mount(&server)
        .await;

    let resp = client.get_nic_ips("M5GFQ2BE1DCM").await.unwrap();
    let nics = resp.nics.unwrap();
    let first = nics.iter().next().unwrap();
    assert_eq!(first.ip.as_ref().unwrap()[0], "10.0.0.5/24");
}

#[tokio::test]
async fn test_get_nic_ips_single_object_shape() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/M5GFQ2BE1DCM/nicips"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nics": { "ipAddress": ["172.16.4.9/16"] }
        })))
        .mount(&server)
        .await;

    let resp = client.get_nic_ips("M5GFQ2BE1DCM").await.unwrap();
    let nics = resp.nics.unwrap();
    let first = nics.iter().next().unwrap();
    assert_eq!(first.ip_address.as_ref().unwrap()[0], "172.16.4.9/16");
}

// ── Networks ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_networks() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vmnet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "num": 1,
            "vmnets": [{
                "name": "vmnet8",
                "type": "nat",
                "dhcp": "true",
                "subnet": "192.168.12.0",
                "mask": "255.255.255.0"
            }]
        })))
        .mount(&server)
        .await;

    let networks = client.list_networks().await.unwrap();
    assert_eq!(networks.num, 1);
    assert_eq!(networks.vmnets[0].name, "vmnet8");
    assert_eq!(networks.vmnets[0].net_type, "nat");
}

#[tokio::test]
async fn test_set_port_forward_empty_response() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/vmnet/vmnet8/portforward/tcp/8080"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .set_port_forward(
            "vmnet8",
            "tcp",
            8080,
            &vmdash_api::types::PortForwardParams {
                guest_ip: "192.168.12.34".into(),
                guest_port: 80,
                desc: Some("web".into()),
            },
        )
        .await
        .unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_vms().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unparseable_error_body_keeps_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_vms().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.api_code(), None);
}

#[tokio::test]
async fn test_delete_vm() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/vms/M5GFQ2BE1DCM"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_vm("M5GFQ2BE1DCM").await.unwrap();
}
