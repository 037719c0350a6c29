//! End-to-end client tests over a scripted runner
//!
//! `ScriptedRunner` replays canned vpncmd transcripts instead of spawning
//! real processes, so every operation is exercised through the same path
//! production takes: argv construction, invocation, report parsing, record
//! mapping.

use rvpnadm::{
    AdminClient, AdminError, Config, CreateUserRequest, RawOutput, Result, VpncmdRunner,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays queued outputs and records every argv it was asked to run.
struct ScriptedRunner {
    responses: Mutex<VecDeque<RawOutput>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    fn new(responses: impl IntoIterator<Item = RawOutput>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn single(response: RawOutput) -> Self {
        Self::new([response])
    }

    fn recorded_calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl VpncmdRunner for ScriptedRunner {
    async fn run(&self, _binary: &str, argv: &[String], _timeout: Duration) -> Result<RawOutput> {
        self.calls.lock().unwrap().push(argv.to_vec());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted runner ran out of responses"))
    }
}

fn test_config() -> Config {
    r#"
[server]
address = "10.0.0.1"
port = 992
password = "secret"
hub = "HUB1"
"#
    .parse()
    .expect("test config parses")
}

fn client(runner: ScriptedRunner) -> AdminClient<ScriptedRunner> {
    AdminClient::with_runner(test_config(), runner).expect("client builds")
}

const STATUS_REPORT: &str = "\
VPN Server>ServerStatusGet
ServerStatusGet command - Get Current Server Status
Item                          |Value
------------------------------+---------------------------
Server Type                   |Standalone Server
Number of Active Sockets      |19
Number of Sessions            |2
Number of Users               |5
Current Time                  |2017-04-19 02:05:16.262
Server Started at             |2017-04-19 (Wed) 02:05:16
Outgoing Unicast Total Size   |4,734,874 bytes
Outgoing Broadcast Total Size |1,126 bytes
Incoming Unicast Total Size   |2,000 bytes
Incoming Broadcast Total Size |48 bytes
The command completed successfully.
";

#[tokio::test]
async fn server_status_parses_and_sums() {
    let client = client(ScriptedRunner::single(RawOutput::ok(STATUS_REPORT)));
    let status = client.server_status().await.expect("status parses");

    assert_eq!(status.number_of_sessions, 2);
    assert_eq!(status.number_of_users, 5);
    assert_eq!(status.current_server_time, "2017-04-19 02:05:16");
    assert_eq!(status.server_start_time, "2017-04-19 02:05:16");
    assert_eq!(status.outgoing_bytes, 4_736_000);
    assert_eq!(status.incoming_bytes, 2_048);
}

#[tokio::test]
async fn server_status_argv_carries_credentials() {
    let runner = ScriptedRunner::single(RawOutput::ok(STATUS_REPORT));
    let client = client(runner);
    client.server_status().await.expect("status parses");

    let calls = client.runner_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            "/server",
            "10.0.0.1:992",
            "/password:secret",
            "/cmd",
            "ServerStatusGet",
        ]
    );
}

const SESSION_LIST_REPORT: &str = "\
VPN Server/HUB1>SessionList
SessionList command - Get List of Connected Sessions
Item             |Value
-----------------+--------------------
Session Name     |SID-SECURENAT-1
Location         |Local Session
User Name        |SecureNAT
Source Host Name |Local SecureNAT
TCP Connections  |None
Transfer Bytes   |36,521 bytes
Transfer Packets |321 packets
Item             |Value
-----------------+--------------------
Session Name     |SID-ALICE-2
Location         |Local Session
User Name        |alice
Source Host Name |203.0.113.7
TCP Connections  |2
Transfer Bytes   |1,024 bytes
Transfer Packets |8 packets
The command completed successfully.
";

#[tokio::test]
async fn session_list_groups_records_in_order() {
    let client = client(ScriptedRunner::single(RawOutput::ok(SESSION_LIST_REPORT)));
    let sessions = client.session_list().await.expect("list parses");

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].session_name, "SID-SECURENAT-1");
    assert_eq!(sessions[0].transfer_bytes, 36_521);
    assert_eq!(sessions[0].transfer_packets, 321);
    assert_eq!(sessions[1].session_name, "SID-ALICE-2");
    assert_eq!(sessions[1].user_name, "alice");
    assert_eq!(sessions[1].transfer_bytes, 1_024);
}

#[tokio::test]
async fn session_list_scopes_to_hub() {
    let runner = ScriptedRunner::single(RawOutput::ok(SESSION_LIST_REPORT));
    let client = client(runner);
    client.session_list().await.expect("list parses");

    let calls = client.runner_calls();
    assert!(calls[0].contains(&"/hub:HUB1".to_string()));
    assert!(calls[0].contains(&"SessionList".to_string()));
}

#[tokio::test]
async fn truncated_session_list_drops_open_record() {
    // Second entity is cut off before its terminal field.
    let truncated = "\
Session Name     |SID-A-1
Transfer Bytes   |10 bytes
Transfer Packets |1 packets
Session Name     |SID-B-2
Transfer Bytes   |20 bytes
";
    let client = client(ScriptedRunner::single(RawOutput::ok(truncated)));
    let sessions = client.session_list().await.expect("list parses");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_name, "SID-A-1");
}

const USER_LIST_REPORT: &str = "\
VPN Server/HUB1>UserList
UserList command - Get List of Users
Item             |Value
-----------------+--------------------
User Name        |alice
Full Name        |Alice Example
Group Name       |-
Description      |ops account
Auth Method      |Password Authentication
Num Logins       |12
Last Login       |2017-04-19 (Wed) 02:05:16
Expiration Date  |No Expiration
Transfer Bytes   |4,734,874 bytes
Transfer Packets |57 packets
Item             |Value
-----------------+--------------------
User Name        |bob
Full Name        |-
Group Name       |-
Description      |-
Auth Method      |Password Authentication
Num Logins       |0
Last Login       |(None)
Expiration Date  |No Expiration
Transfer Bytes   |0 bytes
Transfer Packets |0 packets
The command completed successfully.
";

#[tokio::test]
async fn user_list_normalizes_timestamps_and_counters() {
    let client = client(ScriptedRunner::single(RawOutput::ok(USER_LIST_REPORT)));
    let users = client.user_list().await.expect("list parses");

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].user_name, "alice");
    assert_eq!(users[0].last_login, "2017-04-19 02:05:16");
    assert_eq!(users[0].transfer_bytes, 4_734_874);
    assert_eq!(users[0].num_logins, 12);
    // Never-logged-in sentinel passes through unsliced.
    assert_eq!(users[1].last_login, "(None)");
    assert_eq!(users[1].transfer_bytes, 0);
}

const USER_GET_REPORT: &str = "\
VPN Server/HUB1>UserGet alice
UserGet command - Get User Information
Item                          |Value
------------------------------+---------------------------
User Name                     |alice
Full Name                     |Alice Example
Description                   |ops account
Group Name                    |-
Expiration Date               |No Expiration
Auth Method                   |Password Authentication
Created on                    |2017-04-19 (Wed) 02:05:16
Updated on                    |2018-01-02 (Tue) 03:04:05
Outgoing Unicast Packets      |100 packets
Outgoing Unicast Total Size   |1,000 bytes
Outgoing Broadcast Packets    |10 packets
Outgoing Broadcast Total Size |200 bytes
Incoming Unicast Packets      |50 packets
Incoming Unicast Total Size   |500 bytes
Incoming Broadcast Packets    |5 packets
Incoming Broadcast Total Size |80 bytes
The command completed successfully.
";

#[tokio::test]
async fn user_info_maps_detail_fields() {
    let client = client(ScriptedRunner::single(RawOutput::ok(USER_GET_REPORT)));
    let user = client.user_info("alice").await.expect("detail parses");

    assert_eq!(user.user_name, "alice");
    assert_eq!(user.created_on, "2017-04-19 02:05:16");
    assert_eq!(user.updated_on, "2018-01-02 03:04:05");
    assert_eq!(user.outgoing_unicast_bytes, 1_000);
    assert_eq!(user.incoming_broadcast_packets, 5);
}

#[tokio::test]
async fn empty_report_is_not_found() {
    let client = client(ScriptedRunner::single(RawOutput::ok(
        "VPN Server/HUB1>UserGet ghost\nThe command completed successfully.\n",
    )));
    // No delimited lines at all assembles an empty record.
    assert!(matches!(
        client.user_info("ghost").await,
        Err(AdminError::NotFound(_))
    ));
}

#[tokio::test]
async fn failure_surfaces_extracted_code() {
    let client = client(ScriptedRunner::single(RawOutput::failed(
        "Error occurred. (Error code: 29)\nObject does not exist.",
    )));
    let err = client.delete_user("ghost").await.unwrap_err();
    assert!(matches!(err, AdminError::Invocation { code: 29, .. }));
    assert_eq!(err.tool_code(), Some(29));
}

#[tokio::test]
async fn failure_without_digits_is_unknown() {
    let client = client(ScriptedRunner::single(RawOutput::failed(
        "connection refused",
    )));
    let err = client.server_status().await.unwrap_err();
    assert!(matches!(err, AdminError::InvocationUnknown(_)));
    assert_eq!(err.tool_code(), None);
}

#[tokio::test]
async fn create_user_builds_full_argv() {
    let runner = ScriptedRunner::single(RawOutput::ok(""));
    let client = client(runner);
    let request = CreateUserRequest::new("alice", "alice@example.com").note("ops");
    client.create_user(&request).await.expect("create succeeds");

    let calls = client.runner_calls();
    assert_eq!(
        calls[0],
        vec![
            "/server",
            "10.0.0.1:992",
            "/password:secret",
            "/hub:HUB1",
            "/cmd",
            "UserCreate",
            "alice",
            "/REALNAME:alice@example.com",
            "/NOTE:ops",
            "/GROUP:",
        ]
    );
}

#[tokio::test]
async fn disable_user_sets_past_expiry() {
    let runner = ScriptedRunner::single(RawOutput::ok(""));
    let client = client(runner);
    client
        .set_user_enabled("alice", false)
        .await
        .expect("disable succeeds");

    let calls = client.runner_calls();
    let expires = calls[0]
        .iter()
        .find(|arg| arg.starts_with("/expires:"))
        .expect("expires flag present");
    // now - 1 day in slash format, e.g. "/expires:2017/04/18 02:05:16"
    assert_eq!(expires.len(), "/expires:".len() + 19);
    assert!(expires.contains('/'));
}

#[tokio::test]
async fn enable_user_clears_expiry() {
    let runner = ScriptedRunner::single(RawOutput::ok(""));
    let client = client(runner);
    client
        .set_user_enabled("alice", true)
        .await
        .expect("enable succeeds");

    let calls = client.runner_calls();
    assert!(calls[0].contains(&"/expires:none".to_string()));
}

#[tokio::test]
async fn set_pre_shared_key_is_server_scoped() {
    let runner = ScriptedRunner::single(RawOutput::ok(""));
    let client = client(runner);
    client
        .set_pre_shared_key("topsecret")
        .await
        .expect("psk set succeeds");

    let calls = client.runner_calls();
    // IPsecEnable takes the hub as /DEFAULTHUB:, not as a /hub: prefix.
    assert!(!calls[0].contains(&"/hub:HUB1".to_string()));
    assert!(calls[0].contains(&"/DEFAULTHUB:HUB1".to_string()));
    assert!(calls[0].contains(&"/PSK:topsecret".to_string()));
    assert!(calls[0].contains(&"/L2TP:yes".to_string()));
}

#[tokio::test]
async fn hub_scoped_operation_requires_hub() {
    let mut config = test_config();
    config.server.hub = None;
    let client = AdminClient::with_runner(config, ScriptedRunner::new([])).expect("client builds");
    assert!(matches!(
        client.user_list().await,
        Err(AdminError::Config(_))
    ));
}

/// Accessor used by the argv assertions above.
trait RunnerCalls {
    fn runner_calls(&self) -> Vec<Vec<String>>;
}

impl RunnerCalls for AdminClient<ScriptedRunner> {
    fn runner_calls(&self) -> Vec<Vec<String>> {
        self.runner().recorded_calls()
    }
}

#[tokio::test]
async fn config_round_trips_through_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, test_config().to_toml().expect("serializes")).expect("writes");

    let loaded = Config::from_file(&path).expect("loads");
    assert_eq!(loaded.endpoint(), "10.0.0.1:992");
    assert_eq!(loaded.server.hub.as_deref(), Some("HUB1"));
}
