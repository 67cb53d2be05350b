//! Handlers for the list, info, start, stop, delete, and deploy commands.
//!
//! Each handler is one stateless request/response round trip: call the
//! injected [`ServerApi`], check the envelope, render or log. Logical
//! failures (`success: false`) are errors for every command, mutating ones
//! included, so the exit code always reflects what the endpoint reported.

use std::io::Write;

use gpufleet_api_models::DeployRequest;
use tracing::info;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult, ServerApi, ensure_success};
use crate::output::{render_server_detail, render_server_list};

pub(crate) async fn handle_list(api: &impl ServerApi, output: OutputFormat) -> CliResult<()> {
    let list = ensure_success(api.list_servers().await?)?;
    print!("{}", render_server_list(&list, output)?);
    Ok(())
}

pub(crate) async fn handle_info(
    api: &impl ServerApi,
    server_id: &str,
    output: OutputFormat,
) -> CliResult<()> {
    let payload = ensure_success(api.get_server(server_id).await?)?;
    print!("{}", render_server_detail(&payload.server, output)?);
    Ok(())
}

pub(crate) async fn handle_start(api: &impl ServerApi, server_id: &str) -> CliResult<()> {
    ensure_success(api.start_server(server_id).await?)?;
    info!("success");
    Ok(())
}

pub(crate) async fn handle_stop(api: &impl ServerApi, server_id: &str) -> CliResult<()> {
    ensure_success(api.stop_server(server_id).await?)?;
    info!("success");
    Ok(())
}

pub(crate) async fn handle_delete(api: &impl ServerApi, server_id: &str) -> CliResult<()> {
    ensure_success(api.delete_server(server_id).await?)?;
    info!("success");
    Ok(())
}

/// Deploy writes the created server's id as a bare line so scripts can
/// capture it directly. The writer is injected (stdout in production) so the
/// line is testable byte for byte.
pub(crate) async fn handle_deploy(
    api: &impl ServerApi,
    request: DeployRequest,
    out: &mut impl Write,
) -> CliResult<()> {
    let deployed = ensure_success(api.deploy_server(&request).await?)?;
    writeln!(out, "{}", deployed.server.id).map_err(CliError::failure)?;
    info!("success");
    Ok(())
}
