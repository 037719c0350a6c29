//! Typed records returned by the admin operations
//!
//! Each record type carries the fixed label table of one vpncmd report and a
//! mapper that routes every field through byte-count, timestamp or
//! pass-through normalization. Mapping never fails: absent fields and
//! digit-less counters degrade to defaults (empty string / zero) with a
//! warning, per the error handling policy. Serialized field names match the
//! camelCase keys of the tool's original consumers (`numberOfSessions`,
//! `incomingBytes`, ...).

use crate::report::{
    normalize_timestamp, parse_byte_count, ListLayout, Record, RecordLayout, TABLE_HEADER_KEY,
};
use serde::Serialize;

/// Layout of every singleton report (ServerStatusGet, SessionGet, UserGet)
pub const SINGLE_LAYOUT: RecordLayout = RecordLayout {
    header_key: TABLE_HEADER_KEY,
};

/// Layout of SessionList reports
pub const SESSION_LIST_LAYOUT: ListLayout = ListLayout {
    header_key: TABLE_HEADER_KEY,
    terminal_key: "Transfer Packets",
};

/// Layout of UserList reports
pub const USER_LIST_LAYOUT: ListLayout = ListLayout {
    header_key: TABLE_HEADER_KEY,
    terminal_key: "Transfer Packets",
};

/// Trimmed pass-through field; empty when absent.
fn text_field(record: &Record, label: &str) -> String {
    record.text(label)
}

/// Count or byte-total field; absent or digit-less values degrade to zero.
fn count_field(record: &Record, label: &str) -> u64 {
    match record.get(label) {
        Some(value) => parse_byte_count(value).unwrap_or_else(|_| {
            log::warn!("field {label:?} has no digits, defaulting to 0: {value:?}");
            0
        }),
        None => 0,
    }
}

/// Timestamp field; malformed values degrade to the raw text.
fn time_field(record: &Record, label: &str) -> String {
    let raw = record.text(label);
    normalize_timestamp(&raw).unwrap_or_else(|_| {
        log::warn!("field {label:?} is not a recognized timestamp: {raw:?}");
        raw
    })
}

/// First 19 characters of an already-canonical timestamp, dropping the
/// sub-second suffix vpncmd appends to "Current Time".
fn truncated_time_field(record: &Record, label: &str) -> String {
    let raw = record.text(label);
    match raw.char_indices().nth(19) {
        Some((idx, _)) => raw[..idx].to_string(),
        None => raw,
    }
}

/// Server-wide status from `ServerStatusGet`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub number_of_sessions: u64,
    pub number_of_users: u64,
    pub current_server_time: String,
    pub server_start_time: String,
    /// Incoming unicast + broadcast total size
    pub incoming_bytes: u64,
    /// Outgoing unicast + broadcast total size
    pub outgoing_bytes: u64,
}

impl ServerStatus {
    pub fn from_record(record: &Record) -> Self {
        Self {
            number_of_sessions: count_field(record, "Number of Sessions"),
            number_of_users: count_field(record, "Number of Users"),
            current_server_time: truncated_time_field(record, "Current Time"),
            server_start_time: time_field(record, "Server Started at"),
            incoming_bytes: count_field(record, "Incoming Unicast Total Size")
                + count_field(record, "Incoming Broadcast Total Size"),
            outgoing_bytes: count_field(record, "Outgoing Unicast Total Size")
                + count_field(record, "Outgoing Broadcast Total Size"),
        }
    }
}

/// One entry of a `SessionList` report
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_name: String,
    pub location: String,
    pub user_name: String,
    pub source_host_name: String,
    pub tcp_connections: String,
    pub transfer_bytes: u64,
    pub transfer_packets: u64,
}

impl SessionSummary {
    pub fn from_record(record: &Record) -> Self {
        Self {
            session_name: text_field(record, "Session Name"),
            location: text_field(record, "Location"),
            user_name: text_field(record, "User Name"),
            source_host_name: text_field(record, "Source Host Name"),
            tcp_connections: text_field(record, "TCP Connections"),
            transfer_bytes: count_field(record, "Transfer Bytes"),
            transfer_packets: count_field(record, "Transfer Packets"),
        }
    }
}

/// Full session detail from `SessionGet`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub session_name: String,
    pub user_name: String,
    pub client_ip_address: String,
    pub client_host_name: String,
    pub first_established: String,
    pub current_established: String,
    pub outgoing_data_bytes: u64,
    pub incoming_data_bytes: u64,
    pub outgoing_unicast_packets: u64,
    pub outgoing_unicast_bytes: u64,
    pub outgoing_broadcast_packets: u64,
    pub outgoing_broadcast_bytes: u64,
    pub incoming_unicast_packets: u64,
    pub incoming_unicast_bytes: u64,
    pub incoming_broadcast_packets: u64,
    pub incoming_broadcast_bytes: u64,
}

impl SessionDetail {
    pub fn from_record(record: &Record) -> Self {
        Self {
            session_name: text_field(record, "Session Name"),
            user_name: text_field(record, "User Name (Authentication)"),
            client_ip_address: text_field(record, "Client IP Address"),
            client_host_name: text_field(record, "Client Host Name"),
            first_established: time_field(record, "First Session has been Established since"),
            current_established: time_field(record, "Current Session has been Established since"),
            outgoing_data_bytes: count_field(record, "Outgoing Data Size"),
            incoming_data_bytes: count_field(record, "Incoming Data Size"),
            outgoing_unicast_packets: count_field(record, "Outgoing Unicast Packets"),
            outgoing_unicast_bytes: count_field(record, "Outgoing Unicast Total Size"),
            outgoing_broadcast_packets: count_field(record, "Outgoing Broadcast Packets"),
            outgoing_broadcast_bytes: count_field(record, "Outgoing Broadcast Total Size"),
            incoming_unicast_packets: count_field(record, "Incoming Unicast Packets"),
            incoming_unicast_bytes: count_field(record, "Incoming Unicast Total Size"),
            incoming_broadcast_packets: count_field(record, "Incoming Broadcast Packets"),
            incoming_broadcast_bytes: count_field(record, "Incoming Broadcast Total Size"),
        }
    }
}

/// One entry of a `UserList` report
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_name: String,
    pub full_name: String,
    pub group_name: String,
    pub description: String,
    pub auth_method: String,
    pub num_logins: u64,
    /// Canonical timestamp, or the "(None)" sentinel when the user never
    /// logged in
    pub last_login: String,
    pub expiration_date: String,
    pub transfer_bytes: u64,
    pub transfer_packets: u64,
}

impl UserSummary {
    pub fn from_record(record: &Record) -> Self {
        Self {
            user_name: text_field(record, "User Name"),
            full_name: text_field(record, "Full Name"),
            group_name: text_field(record, "Group Name"),
            description: text_field(record, "Description"),
            auth_method: text_field(record, "Auth Method"),
            num_logins: count_field(record, "Num Logins"),
            last_login: time_field(record, "Last Login"),
            expiration_date: text_field(record, "Expiration Date"),
            transfer_bytes: count_field(record, "Transfer Bytes"),
            transfer_packets: count_field(record, "Transfer Packets"),
        }
    }
}

/// Full user detail from `UserGet`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub user_name: String,
    pub full_name: String,
    pub description: String,
    pub group_name: String,
    pub expiration_date: String,
    pub auth_method: String,
    pub created_on: String,
    pub updated_on: String,
    pub outgoing_unicast_packets: u64,
    pub outgoing_unicast_bytes: u64,
    pub outgoing_broadcast_packets: u64,
    pub outgoing_broadcast_bytes: u64,
    pub incoming_unicast_packets: u64,
    pub incoming_unicast_bytes: u64,
    pub incoming_broadcast_packets: u64,
    pub incoming_broadcast_bytes: u64,
}

impl UserDetail {
    pub fn from_record(record: &Record) -> Self {
        Self {
            user_name: text_field(record, "User Name"),
            full_name: text_field(record, "Full Name"),
            description: text_field(record, "Description"),
            group_name: text_field(record, "Group Name"),
            expiration_date: text_field(record, "Expiration Date"),
            auth_method: text_field(record, "Auth Method"),
            created_on: time_field(record, "Created on"),
            updated_on: time_field(record, "Updated on"),
            outgoing_unicast_packets: count_field(record, "Outgoing Unicast Packets"),
            outgoing_unicast_bytes: count_field(record, "Outgoing Unicast Total Size"),
            outgoing_broadcast_packets: count_field(record, "Outgoing Broadcast Packets"),
            outgoing_broadcast_bytes: count_field(record, "Outgoing Broadcast Total Size"),
            incoming_unicast_packets: count_field(record, "Incoming Unicast Packets"),
            incoming_unicast_bytes: count_field(record, "Incoming Unicast Total Size"),
            incoming_broadcast_packets: count_field(record, "Incoming Broadcast Packets"),
            incoming_broadcast_bytes: count_field(record, "Incoming Broadcast Total Size"),
        }
    }
}
