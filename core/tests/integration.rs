//! Full archive lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, the auth header and content-type driven parsing work end-to-end.
#![cfg(feature = "ureq")]

use archiving_core::{
    Archive, ArchiveList, ArchiveStatus, ArchivingClient, Body, ErrorKind, RequestOptions,
};
use mock_server::Partner;

/// Spawn the mock server on its own runtime thread and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, Partner::new("100", "secret")).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn archive_lifecycle() {
    let endpoint = start_server();
    let client = ArchivingClient::new("100", "secret").with_endpoint(&endpoint);
    assert_eq!(client.base_path(), format!("{endpoint}/v2/partner/100"));

    // Step 1: list — should be empty.
    let resp = client.get_archives(0, 10).unwrap();
    assert_eq!(resp.status, 200);
    let list: ArchiveList = resp.decode().unwrap();
    assert_eq!(list.count, 0);

    // Step 2: start an archive.
    let resp = client.start_archiving_session("sess1", "myname").unwrap();
    assert_eq!(resp.status, 200);
    let started: Archive = resp.decode().unwrap();
    assert_eq!(started.status, ArchiveStatus::Started);
    assert_eq!(started.session_id.as_deref(), Some("sess1"));
    assert_eq!(started.name.as_deref(), Some("myname"));
    let id = started.id.clone();

    // Step 3: starting the same session again is a 409, returned as data.
    let resp = client.start_archiving_session("sess1", "again").unwrap();
    assert_eq!(resp.status, 409);
    assert_eq!(resp.error_for_status().unwrap_err().kind(), ErrorKind::Generic);

    // Step 4: get the archive.
    let fetched: Archive = client.get_archive(&id).unwrap().decode().unwrap();
    assert_eq!(fetched, started);

    // Step 5: stop it.
    let resp = client.stop_archiving_session(&id).unwrap();
    assert_eq!(resp.status, 200);
    let stopped: Archive = resp.decode().unwrap();
    assert_eq!(stopped.status, ArchiveStatus::Stopped);

    // Step 6: default listing window sees it.
    let list: ArchiveList = client.list_archives().unwrap().decode().unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.items[0].id, id);

    // Step 7: delete — 204 with an empty, untyped body.
    let resp = client.delete_archive(&id).unwrap();
    assert_eq!(resp.status, 204);
    assert_eq!(resp.body, Body::Text(String::new()));

    // Step 8: get after delete — 404 JSON error, still not an Err.
    let resp = client.get_archive(&id).unwrap();
    assert_eq!(resp.status, 404);
    assert!(matches!(resp.body, Body::Json(_)));
}

#[test]
fn wrong_secret_is_returned_as_403() {
    let endpoint = start_server();
    let client = ArchivingClient::new("100", "not-the-secret").with_endpoint(&endpoint);

    let resp = client.get_archives(0, 1).unwrap();
    assert_eq!(resp.status, 403);
    let err = resp.error_for_status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(err.message().contains("Invalid API_KEY"));
}

#[test]
fn non_json_responses_pass_through_as_text() {
    let endpoint = start_server();
    let client = ArchivingClient::new("100", "secret").with_endpoint(&endpoint);

    // The router rejects a non-UUID id with a text/plain 400.
    let resp = client.get_archive("not-a-uuid").unwrap();
    assert_eq!(resp.status, 400);
    assert!(matches!(resp.body, Body::Text(ref text) if !text.is_empty()));
}

#[test]
fn form_bodies_reach_the_server_verbatim() {
    let endpoint = start_server();
    let client = ArchivingClient::new("100", "secret").with_endpoint(&endpoint);

    // The archive routes only accept JSON, so a form body is refused.
    let opts = RequestOptions::form("action=start&sessionId=sess1");
    let resp = client.post("/archive", Some(&opts)).unwrap();
    assert_eq!(resp.status, 415);
}

#[test]
fn unreachable_endpoint_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ArchivingClient::new("100", "secret").with_endpoint(&format!("http://{addr}"));
    let err = client.get_archive("a").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
}
