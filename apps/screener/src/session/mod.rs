pub mod flows;
pub mod links;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_sessions::session::Error as SessionError;
use tower_sessions::Session;
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::flows::{FlowId, FlowStore};

const FLOW_KEY: &str = "flow_id";

/// Flow id stored in the visitor's cookie session, created on first use.
pub async fn flow_id(session: &Session) -> Result<FlowId, SessionError> {
    if let Some(id) = session.get::<FlowId>(FLOW_KEY).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(FLOW_KEY, id).await?;
    Ok(id)
}

/// Periodically evicts flows idle longer than `max_idle`, so abandoned
/// sessions do not keep their uploads and links alive.
pub fn spawn_sweeper(flows: Arc<FlowStore>, every: Duration, max_idle: Duration) -> JoinHandle<()> {
    let every = every.max(Duration::from_secs(1));
    info!(?every, ?max_idle, "Starting idle flow sweeper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if flows.is_empty() {
                continue;
            }
            let evicted = flows.evict_idle(max_idle);
            debug!(
                evicted,
                flows = flows.len(),
                links = flows.links().len(),
                "Idle flow sweep finished"
            );
        }
    })
}
