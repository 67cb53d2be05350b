//! The manage command: resolve a server's dashboard link and open it.

use anyhow::Context as _;
use gpufleet_api_models::ServerDetail;

use crate::client::{CliError, CliResult, ServerApi, ensure_success};

/// Injected browser-launching capability so tests can stub the side effect.
pub(crate) trait DashboardLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Launcher backed by the operating system's default URL handler.
pub(crate) struct SystemLauncher;

impl DashboardLauncher for SystemLauncher {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        open::that(url).with_context(|| format!("failed to open browser at {url}"))
    }
}

/// Extract `links["dashboard"]["href"]` from a server detail record.
pub(crate) fn dashboard_url(detail: &ServerDetail) -> CliResult<&str> {
    let entry = detail.links.get("dashboard").ok_or_else(|| {
        CliError::validation(format!("server {} has no dashboard link", detail.id))
    })?;
    entry.get("href").map(String::as_str).ok_or_else(|| {
        CliError::validation(format!(
            "dashboard link for server {} is missing an href",
            detail.id
        ))
    })
}

pub(crate) async fn handle_manage(
    api: &impl ServerApi,
    launcher: &impl DashboardLauncher,
    server_id: &str,
) -> CliResult<()> {
    let payload = ensure_success(api.get_server(server_id).await?)?;
    let url = dashboard_url(&payload.server)?;
    launcher.open(url).map_err(CliError::failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use gpufleet_api_models::{
        CostBreakdown, DeployRequest, DeployedPayload, Envelope, NoPayload, ServerList,
        ServerPayload,
    };
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use crate::client::ApiError;

    const DASHBOARD: &str = "https://panel.gpufleet.io/srv-7";

    fn detail_with_links(links: BTreeMap<String, BTreeMap<String, String>>) -> ServerDetail {
        ServerDetail {
            id: "srv-7".into(),
            name: "box".into(),
            location: "na-us-las-1".into(),
            ip: "203.0.113.7".into(),
            cost: CostBreakdown {
                charged: 0.0,
                hour_on: 0.5,
                minutes_on: 0.009,
                hour_off: 0.05,
                minutes_off: 0.001,
            },
            cpu_model: "EPYC 7443P".into(),
            gpu_count: 1,
            gpu_model: "A40".into(),
            ram: 2,
            status: "Running".into(),
            storage: 20,
            storage_class: "st1".into(),
            kind: "gpu".into(),
            vcpus: 1,
            links,
        }
    }

    fn dashboard_links() -> BTreeMap<String, BTreeMap<String, String>> {
        BTreeMap::from([(
            "dashboard".to_string(),
            BTreeMap::from([("href".to_string(), DASHBOARD.to_string())]),
        )])
    }

    /// Serves one canned detail envelope; the other operations are unused by
    /// the manage flow.
    struct DetailApi {
        success: bool,
        detail: ServerDetail,
    }

    #[async_trait]
    impl ServerApi for DetailApi {
        async fn list_servers(&self) -> Result<Envelope<ServerList>, ApiError> {
            unimplemented!("not exercised by manage")
        }

        async fn get_server(&self, _id: &str) -> Result<Envelope<ServerPayload>, ApiError> {
            Ok(Envelope {
                success: self.success,
                payload: ServerPayload {
                    server: self.detail.clone(),
                },
            })
        }

        async fn start_server(&self, _id: &str) -> Result<Envelope<NoPayload>, ApiError> {
            unimplemented!("not exercised by manage")
        }

        async fn stop_server(&self, _id: &str) -> Result<Envelope<NoPayload>, ApiError> {
            unimplemented!("not exercised by manage")
        }

        async fn delete_server(&self, _id: &str) -> Result<Envelope<NoPayload>, ApiError> {
            unimplemented!("not exercised by manage")
        }

        async fn deploy_server(
            &self,
            _request: &DeployRequest,
        ) -> Result<Envelope<DeployedPayload>, ApiError> {
            unimplemented!("not exercised by manage")
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    impl DashboardLauncher for RecordingLauncher {
        fn open(&self, url: &str) -> anyhow::Result<()> {
            self.opened.lock().expect("launcher lock").push(url.into());
            Ok(())
        }
    }

    struct BrokenLauncher;

    impl DashboardLauncher for BrokenLauncher {
        fn open(&self, _url: &str) -> anyhow::Result<()> {
            Err(anyhow!("no browser available"))
        }
    }

    #[tokio::test]
    async fn manage_opens_the_dashboard_link() {
        let api = DetailApi {
            success: true,
            detail: detail_with_links(dashboard_links()),
        };
        let launcher = RecordingLauncher::default();

        handle_manage(&api, &launcher, "srv-7")
            .await
            .expect("manage succeeds");
        let opened = launcher.opened.lock().expect("launcher lock");
        assert_eq!(opened.as_slice(), &[DASHBOARD.to_string()]);
    }

    #[tokio::test]
    async fn manage_fails_when_dashboard_link_is_absent() {
        let api = DetailApi {
            success: true,
            detail: detail_with_links(BTreeMap::new()),
        };
        let launcher = RecordingLauncher::default();

        let err = handle_manage(&api, &launcher, "srv-7")
            .await
            .expect_err("missing dashboard link must fail");
        assert!(err.display_message().contains("no dashboard link"));
        assert_eq!(err.exit_code(), 2);
        assert!(launcher.opened.lock().expect("launcher lock").is_empty());
    }

    #[tokio::test]
    async fn manage_fails_when_href_is_missing() {
        let links = BTreeMap::from([("dashboard".to_string(), BTreeMap::new())]);
        let api = DetailApi {
            success: true,
            detail: detail_with_links(links),
        };
        let launcher = RecordingLauncher::default();

        let err = handle_manage(&api, &launcher, "srv-7")
            .await
            .expect_err("malformed dashboard link must fail");
        assert!(err.display_message().contains("missing an href"));
    }

    #[tokio::test]
    async fn manage_fails_on_logical_failure_before_launching() {
        let api = DetailApi {
            success: false,
            detail: detail_with_links(dashboard_links()),
        };
        let launcher = RecordingLauncher::default();

        let err = handle_manage(&api, &launcher, "srv-7")
            .await
            .expect_err("success=false must fail");
        assert!(err.display_message().contains("endpoint returned error"));
        assert!(launcher.opened.lock().expect("launcher lock").is_empty());
    }

    #[tokio::test]
    async fn manage_surfaces_launcher_failures() {
        let api = DetailApi {
            success: true,
            detail: detail_with_links(dashboard_links()),
        };

        let err = handle_manage(&api, &BrokenLauncher, "srv-7")
            .await
            .expect_err("launcher failure must propagate");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("no browser available"));
    }
}
