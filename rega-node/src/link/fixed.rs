use std::time::Duration;

use async_trait::async_trait;
use rega_core::LinkState;

use super::Link;

/// Always-up link for wired deployments and tests.
pub struct FixedLink;

#[async_trait]
impl Link for FixedLink {
    async fn connect(&self, _timeout: Duration) -> bool {
        true
    }

    async fn is_connected(&self) -> bool {
        true
    }

    async fn state(&self) -> LinkState {
        LinkState::Connected
    }
}
