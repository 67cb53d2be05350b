//! Argument parsing and command dispatch for the `servers` binary.

use std::time::Duration;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gpufleet_api_models::DeployRequest;
use reqwest::{Client, Url};

use crate::client::{CliError, CliResult, HttpServerApi, parse_api_key, parse_url};
use crate::commands::manage::{SystemLauncher, handle_manage};
use crate::commands::servers::{
    handle_delete, handle_deploy, handle_info, handle_list, handle_start, handle_stop,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "https://marketplace.gpufleet.io/api/v0";

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    tracing::debug!(command = command_name, "dispatching");

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

/// Build the API client and launcher explicitly and hand the command to its
/// handler. No global registration; the whole command tree lives in [`Cli`].
async fn dispatch(cli: Cli) -> CliResult<()> {
    let api_key = parse_api_key(cli.api_key)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
    let api = HttpServerApi::new(client, cli.api_url, api_key);
    let launcher = SystemLauncher;

    match cli.command {
        Command::List => handle_list(&api, cli.output).await,
        Command::Info(args) => handle_info(&api, &args.server_id, cli.output).await,
        Command::Start(args) => handle_start(&api, &args.server_id).await,
        Command::Stop(args) => handle_stop(&api, &args.server_id).await,
        Command::Delete(args) => handle_delete(&api, &args.server_id).await,
        Command::Deploy(args) => {
            handle_deploy(&api, args.into_request(), &mut std::io::stdout()).await
        }
        Command::Manage(args) => handle_manage(&api, &launcher, &args.server_id).await,
    }
}

#[derive(Parser, Debug)]
#[command(name = "servers", about = "Manage GPUFleet servers", version)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "GPUFLEET_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "GPUFLEET_API_KEY")]
    pub(crate) api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "GPUFLEET_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// List servers
    List,
    /// Get server info
    Info(ServerIdArg),
    /// Start a server
    Start(ServerIdArg),
    /// Stop a server
    Stop(ServerIdArg),
    /// Delete a server
    Delete(ServerIdArg),
    /// Deploy a server
    Deploy(DeployArgs),
    /// Open the server management panel in a browser
    Manage(ServerIdArg),
}

#[derive(Args, Debug)]
pub(crate) struct ServerIdArg {
    #[arg(help = "Server identifier")]
    pub(crate) server_id: String,
}

/// Positionals and flags for `deploy`. Flag spellings and defaults are part
/// of the tool's contract; combinations are not validated locally, the
/// remote API decides what is deployable.
#[derive(Args, Debug)]
pub(crate) struct DeployArgs {
    #[arg(help = "Server name")]
    pub(crate) name: String,
    #[arg(help = "Administrator user for the provisioned OS")]
    pub(crate) admin_user: String,
    #[arg(help = "Administrator password for the provisioned OS")]
    pub(crate) admin_pass: String,
    #[arg(
        long = "gpuModel",
        default_value = "A40",
        help = "The GPU model to provision"
    )]
    pub(crate) gpu_model: String,
    #[arg(long, default_value = "na-us-las-1", help = "Datacenter location")]
    pub(crate) location: String,
    #[arg(
        long = "instanceType",
        default_value = "gpu",
        help = "Either \"gpu\" or \"cpu\""
    )]
    pub(crate) instance_type: String,
    #[arg(
        long = "gpuCount",
        default_value_t = 1,
        help = "Number of GPUs of the requested model"
    )]
    pub(crate) gpu_count: u32,
    #[arg(long, default_value_t = 1, help = "Number of vCPUs")]
    pub(crate) vcpus: u32,
    #[arg(long, default_value_t = 20, help = "GB of networked storage")]
    pub(crate) storage: u32,
    #[arg(
        long = "storageClass",
        default_value = "st1",
        help = "io1 or st1, depending on the storage class desired"
    )]
    pub(crate) storage_class: String,
    #[arg(long, default_value_t = 2, help = "GB of RAM")]
    pub(crate) ram: u32,
    #[arg(long, default_value = "Ubuntu 18.04 LTS", help = "Operating system")]
    pub(crate) os: String,
}

impl DeployArgs {
    pub(crate) fn into_request(self) -> DeployRequest {
        DeployRequest {
            name: self.name,
            admin_user: self.admin_user,
            admin_pass: self.admin_pass,
            instance_type: self.instance_type,
            gpu_model: self.gpu_model,
            gpu_count: self.gpu_count,
            vcpus: self.vcpus,
            ram: self.ram,
            storage: self.storage,
            storage_class: self.storage_class,
            os: self.os,
            location: self.location,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Info(_) => "info",
        Command::Start(_) => "start",
        Command::Stop(_) => "stop",
        Command::Delete(_) => "delete",
        Command::Deploy(_) => "deploy",
        Command::Manage(_) => "manage",
    }
}
