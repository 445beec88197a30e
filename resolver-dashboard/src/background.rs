use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use resolver_dashboard::view::{aggregate, format_percent, summarize, PollSchedule};

use crate::handlers::refresh_initial_html;
use crate::state::AppState;
use crate::util::now_ms;

/// Polls the upstream feed for the lifetime of the process. A fetch is only
/// issued once the previous one settled.
pub(crate) async fn run_status_poller(state: Arc<AppState>) {
    let mut schedule = PollSchedule::new(state.config.poll);

    loop {
        let delay_ms = match state.client.fetch_snapshot().await {
            Ok(nodes) => {
                let count = nodes.len();
                if schedule.failures() > 0 {
                    info!(
                        nodes = count,
                        failures = schedule.failures(),
                        "status feed recovered"
                    );
                }
                state.record_snapshot(nodes, now_ms()).await;
                refresh_initial_html(&state).await;
                schedule.on_success()
            }
            Err(err) => {
                let delay_ms = schedule.on_failure();
                warn!(
                    ?err,
                    url = %state.client.url(),
                    failures = schedule.failures(),
                    retry_ms = delay_ms,
                    "status fetch failed; retrying"
                );
                state.record_failure(format!("{:#}", err)).await;
                delay_ms
            }
        };
        tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
    }
}

pub(crate) async fn run_fleet_metrics(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(state.config.fleet_metrics_interval);
    loop {
        interval.tick().await;
        let entry = match state.latest_snapshot().await {
            Some(entry) => entry,
            None => continue,
        };

        let nodes = entry.payload.as_ref();
        let totals = aggregate(nodes);
        let online: u64 = totals.values().map(|load| load.count).sum();
        let offline = nodes.iter().filter(|node| node.is_offline()).count();
        let delegators = nodes.iter().filter(|node| node.is_delegator()).count();

        info!(
            nodes = nodes.len(),
            online,
            offline,
            delegators,
            snapshot_age_ms = now_ms().saturating_sub(entry.ts_ms),
            fetch_failures = state.fetch_failures.load(Ordering::SeqCst),
            "fleet metrics"
        );

        for summary in summarize(&totals) {
            info!(
                network = %summary.network,
                nodes = summary.load.count,
                clients = summary.load.clients,
                capacity = summary.load.capacity,
                load = %format_percent(summary.load.load_percent()),
                "network load"
            );
        }
    }
}
