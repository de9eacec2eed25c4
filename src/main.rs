use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use kube_rollout_watch::config::load_config;
use kube_rollout_watch::informer::watch;
use kube_rollout_watch::kubernetes::{build_client, KubePodApi, PodApi};
use kube_rollout_watch::parsing::IdentityExtractor;
use kube_rollout_watch::reconciler::Reconciler;
use kube_rollout_watch::shutdown::spawn_signal_handler;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!("namespace = {}", cfg.namespace);

    let client = build_client(cfg.kubeconfig_path.as_deref())
        .await
        .context("Error creating Kubernetes client")?;
    let api = KubePodApi::new(client.clone());

    let pods = api
        .list_pods(&cfg.namespace)
        .await
        .context("Error retrieving pods")?;

    let extractor = IdentityExtractor::new(&cfg.repo_host)
        .with_context(|| format!("Invalid REPO_HOST {}", cfg.repo_host))?;
    let mut reconciler = Reconciler::new(extractor);
    for notice in reconciler.observe_initial(&api, pods, cfg.reap_succeeded).await {
        notice.emit();
    }
    info!("{}", reconciler.summary());

    let shutdown = CancellationToken::new();
    let _signals = spawn_signal_handler(shutdown.clone()).context("Failed to install signal handler")?;

    watch::run(client, &cfg, &mut reconciler, shutdown).await;

    let health = reconciler.count_health();
    info!("Stopped; pods: {} ({})", reconciler.census().len(), health);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}
