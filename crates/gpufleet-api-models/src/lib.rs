#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the GPUFleet provisioning API.
//!
//! Every entity here is an immutable snapshot deserialized from the remote
//! API; the CLI never mutates, persists, or caches them. Wire field names
//! follow the API's camelCase convention, so the structs carry explicit
//! `rename_all`/`rename` attributes rather than relying on Rust casing.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response wrapper returned by every API endpoint.
///
/// The API reports logical failure through `success: false` next to the
/// payload fields rather than via HTTP status, so the envelope flattens the
/// payload into the same JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Whether the endpoint considered the operation successful.
    pub success: bool,
    /// Endpoint-specific payload fields, flattened beside `success`.
    #[serde(flatten)]
    pub payload: T,
}

/// Payload of `GET /v0/servers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerList {
    /// Servers in the order the API returned them.
    pub servers: Vec<ServerSummary>,
}

/// Payload of `GET /v0/servers/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerPayload {
    /// Full detail record for the requested server.
    pub server: ServerDetail,
}

/// Payload of `POST /v0/servers/deploy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployedPayload {
    /// Identifier of the newly created server.
    pub server: DeployedServer,
}

/// Payload of the mutating endpoints (start/stop/delete), which return the
/// bare envelope with no additional fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoPayload {}

/// One row of the server list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSummary {
    /// Server identifier.
    pub id: String,
    /// Human-readable server name.
    pub name: String,
    /// Datacenter location code, e.g. `na-us-las-1`.
    pub location: String,
    /// Lifecycle status reported by the API, e.g. `Running`.
    pub status: String,
}

/// Cost figures attached to a server detail record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Total amount charged so far.
    pub charged: f64,
    /// Hourly rate while the server is powered on.
    pub hour_on: f64,
    /// Per-minute rate while powered on.
    pub minutes_on: f64,
    /// Hourly rate while powered off.
    pub hour_off: f64,
    /// Per-minute rate while powered off.
    pub minutes_off: f64,
}

/// Full server record as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerDetail {
    /// Server identifier.
    pub id: String,
    /// Human-readable server name.
    pub name: String,
    /// Datacenter location code.
    pub location: String,
    /// Public IP address.
    pub ip: String,
    /// Cost breakdown for this server.
    pub cost: CostBreakdown,
    /// CPU model string.
    pub cpu_model: String,
    /// Number of attached GPUs.
    pub gpu_count: u32,
    /// GPU model string, empty for CPU-only instances.
    pub gpu_model: String,
    /// RAM in GB.
    pub ram: u32,
    /// Lifecycle status.
    pub status: String,
    /// Networked storage in GB.
    pub storage: u32,
    /// Storage class, `io1` or `st1`.
    pub storage_class: String,
    /// Instance type, `gpu` or `cpu`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of vCPUs.
    pub vcpus: u32,
    /// Named URL map, e.g. `links["dashboard"]["href"]` points at the web
    /// management panel.
    #[serde(default)]
    pub links: BTreeMap<String, BTreeMap<String, String>>,
}

/// Identifier stub returned when a deployment is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployedServer {
    /// Identifier of the created server.
    pub id: String,
}

/// Request body for `POST /v0/servers/deploy`.
///
/// Fully specified by CLI flags and positionals; the CLI performs no
/// validation of field combinations (the remote API does).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Server name.
    pub name: String,
    /// Administrator login for the provisioned OS.
    pub admin_user: String,
    /// Administrator password for the provisioned OS.
    pub admin_pass: String,
    /// `gpu` or `cpu`.
    pub instance_type: String,
    /// GPU model to provision.
    pub gpu_model: String,
    /// Number of GPUs of the requested model.
    pub gpu_count: u32,
    /// Number of vCPUs.
    pub vcpus: u32,
    /// RAM in GB.
    pub ram: u32,
    /// Networked storage in GB.
    pub storage: u32,
    /// `io1` or `st1`.
    pub storage_class: String,
    /// Operating system label.
    pub os: String,
    /// Datacenter location code.
    pub location: String,
}
