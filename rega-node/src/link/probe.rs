use std::time::Duration;

use async_trait::async_trait;
use rega_core::LinkState;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::Link;

/// Link that decides reachability by probing a TCP target.
///
/// Each probe is a bounded connect attempt against the configured
/// host:port; `connect` retries on a short interval until the overall
/// timeout runs out.
pub struct ProbeLink {
    target: String,
    probe_timeout: Duration,
    retry_interval: Duration,
    state: Mutex<LinkState>,
}

impl ProbeLink {
    pub fn new(target: String, probe_timeout: Duration, retry_interval: Duration) -> Self {
        Self {
            target,
            probe_timeout,
            retry_interval,
            state: Mutex::new(LinkState::Disconnected),
        }
    }

    /// One bounded reachability probe.
    async fn probe(&self) -> bool {
        matches!(
            tokio::time::timeout(self.probe_timeout, TcpStream::connect(&self.target)).await,
            Ok(Ok(_))
        )
    }

    async fn set_state(&self, state: LinkState) {
        *self.state.lock().await = state;
    }
}

#[async_trait]
impl Link for ProbeLink {
    async fn connect(&self, timeout: Duration) -> bool {
        self.set_state(LinkState::Connecting).await;
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.probe().await {
                self.set_state(LinkState::Connected).await;
                info!(target = %self.target, "Link up");
                return true;
            }

            if tokio::time::Instant::now() + self.retry_interval >= deadline {
                self.set_state(LinkState::Disconnected).await;
                warn!(target = %self.target, timeout_secs = timeout.as_secs(), "Link connect timed out");
                return false;
            }

            debug!(target = %self.target, "Probe failed, retrying");
            tokio::time::sleep(self.retry_interval).await;
        }
    }

    async fn is_connected(&self) -> bool {
        // Re-query the target so a dropped link is noticed, but keep it
        // to a single bounded probe.
        let up = self.probe().await;
        self.set_state(if up {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        })
        .await;
        up
    }

    async fn state(&self) -> LinkState {
        *self.state.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_link(target: String) -> ProbeLink {
        ProbeLink::new(
            target,
            Duration::from_millis(100),
            Duration::from_millis(20),
        )
    }

    #[tokio::test]
    async fn connects_when_target_is_listening() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap().to_string();

        let link = short_link(target);
        assert!(link.connect(Duration::from_millis(500)).await);
        assert_eq!(link.state().await, LinkState::Connected);
        assert!(link.is_connected().await);
    }

    #[tokio::test]
    async fn connect_times_out_against_dead_target() {
        // Bind then drop so the port is known-closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap().to_string();
        drop(listener);

        let link = short_link(target);
        assert!(!link.connect(Duration::from_millis(200)).await);
        assert_eq!(link.state().await, LinkState::Disconnected);
    }
}
