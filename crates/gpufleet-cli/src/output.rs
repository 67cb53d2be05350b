//! Output renderers and formatting helpers for CLI commands.
//!
//! Renderers are pure: they produce the full output as a `String` so nothing
//! reaches stdout until the whole response rendered successfully, and so the
//! formatting is testable without any network machinery.

use anyhow::anyhow;
use gpufleet_api_models::{ServerDetail, ServerList};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_server_list(list: &ServerList, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(list),
        OutputFormat::Table => {
            let mut out = String::new();
            out.push_str(&format!(
                "{:<20} {:<24} {:<16} STATUS\n",
                "ID", "NAME", "LOCATION"
            ));
            for server in &list.servers {
                out.push_str(&format!(
                    "{:<20} {:<24} {:<16} {}\n",
                    server.id, server.name, server.location, server.status
                ));
            }
            Ok(out)
        }
    }
}

pub(crate) fn render_server_detail(
    detail: &ServerDetail,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(detail),
        OutputFormat::Table => {
            let mut out = String::new();
            out.push_str(&format!("{:<18} VALUE\n", "PROPERTY"));
            for (name, value) in detail_rows(detail) {
                out.push_str(&format!("{name:<18} {value}\n"));
            }
            Ok(out)
        }
    }
}

/// The fixed property/value rows of the `info` table. Order is part of the
/// output contract: eighteen rows, one per server detail field.
pub(crate) fn detail_rows(detail: &ServerDetail) -> Vec<(&'static str, String)> {
    vec![
        ("ID", detail.id.clone()),
        ("Name", detail.name.clone()),
        ("Location", detail.location.clone()),
        ("IP", detail.ip.clone()),
        ("Charged Cost", detail.cost.charged.to_string()),
        ("Hour-On Cost", detail.cost.hour_on.to_string()),
        ("Minutes-On Cost", detail.cost.minutes_on.to_string()),
        ("Hour-Off Cost", detail.cost.hour_off.to_string()),
        ("Minutes-Off Cost", detail.cost.minutes_off.to_string()),
        ("CPU Model", detail.cpu_model.clone()),
        ("GPU Count", detail.gpu_count.to_string()),
        ("GPU Model", detail.gpu_model.clone()),
        ("RAM", format!("{}GB", detail.ram)),
        ("Status", detail.status.clone()),
        ("Storage", format!("{}GB", detail.storage)),
        ("Storage Class", detail.storage_class.clone()),
        ("Type", detail.kind.clone()),
        ("vCPUs", detail.vcpus.to_string()),
    ]
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    Ok(format!("{text}\n"))
}
