use std::pin::pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{InformerCache, PodEvent};
use crate::diff::diff_pods;
use crate::reconciler::Reconciler;
use crate::types::Config;

#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    pub resync_interval: Option<Duration>,
    pub log_pod_diff: bool,
}

impl From<&Config> for WatchOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            resync_interval: cfg.resync_interval,
            log_pod_diff: cfg.log_pod_diff,
        }
    }
}

/// Watches the configured namespace until `shutdown` fires. Watch errors
/// are logged and left to the watcher's own backoff.
pub async fn run(client: Client, cfg: &Config, reconciler: &mut Reconciler, shutdown: CancellationToken) {
    let api: Api<Pod> = Api::namespaced(client, &cfg.namespace);
    let stream = watcher(api, watcher::Config::default()).default_backoff();
    info!("Watching pods in namespace {}", cfg.namespace);
    drive(stream, &cfg.namespace, &WatchOptions::from(cfg), reconciler, shutdown).await;
}

/// Feeds watcher events through the informer cache into `reconciler`, one
/// at a time, until the stream ends or `shutdown` fires.
pub async fn drive<S>(
    stream: S,
    namespace: &str,
    options: &WatchOptions,
    reconciler: &mut Reconciler,
    shutdown: CancellationToken,
) where
    S: Stream<Item = Result<watcher::Event<Pod>, watcher::Error>>,
{
    let mut stream = pin!(stream);
    let mut cache = InformerCache::new(namespace);
    let mut resync = options.resync_interval.map(resync_timer);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                info!("Shutdown requested, closing pod watch");
                break;
            }
            _ = tick(&mut resync) => {
                debug!(pods = cache.len(), "resync");
                for event in cache.resync() {
                    handle(reconciler, &event, options.log_pod_diff);
                }
            }
            next = stream.next() => match next {
                Some(Ok(event)) => {
                    for event in cache.apply(event) {
                        handle(reconciler, &event, options.log_pod_diff);
                    }
                }
                Some(Err(e)) => warn!("Pod watch error: {}", e),
                None => {
                    warn!("Pod watch stream ended");
                    break;
                }
            }
        }
    }
}

fn handle(reconciler: &mut Reconciler, event: &PodEvent, log_pod_diff: bool) {
    if log_pod_diff {
        if let PodEvent::Updated { old, new } = event {
            for change in diff_pods(old, new) {
                debug!(pod = %new.name, "{}", change);
            }
        }
    }
    if let Some(notice) = event.dispatch(reconciler) {
        notice.emit();
    }
}

fn resync_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
