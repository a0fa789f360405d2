use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use dotyield_core::session::Session;

/// Simulated wallet connection: after `delay` the pending session becomes connected with the
/// mock `address`. Returns `None` when a connection is already pending or established.
/// A timer left over from a disconnected attempt never completes a later one.
pub async fn spawn_connect(
    session: Arc<Mutex<Session>>,
    delay: Duration,
    address: Arc<str>,
) -> Option<JoinHandle<()>> {
    let attempt = session.lock().await.begin_connect()?;

    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        session.lock().await.complete_connect(attempt, &address);
    }))
}
