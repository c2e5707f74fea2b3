#![allow(dead_code)]

use std::sync::Arc;
use tessera::{BoxFuture, Dashboard, LoaderConfig, Spawner, testing::ScriptedSource};

// ============================================================================
// Runtime
// ============================================================================

pub fn spawner() -> Arc<dyn Spawner> {
    Arc::new(|task: BoxFuture<'static, ()>| {
        tokio::spawn(task);
    })
}

// ============================================================================
// Dashboards
// ============================================================================

pub fn dashboard(source: &Arc<ScriptedSource>) -> Dashboard {
    Dashboard::new(source.clone(), spawner())
}

pub fn dashboard_with(source: &Arc<ScriptedSource>, config: LoaderConfig) -> Dashboard {
    Dashboard::with_config(source.clone(), spawner(), config)
}

/// Let spawned tasks run until `done` holds, or give up.
pub async fn settle(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..64 {
        if done() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    done()
}
