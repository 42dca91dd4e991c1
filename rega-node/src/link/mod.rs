pub mod fixed;
pub mod probe;

use std::time::Duration;

use async_trait::async_trait;
use rega_core::LinkState;

/// The wireless (or wired) uplink of the node.
///
/// `connect` blocks until association succeeds or the timeout elapses;
/// it never errors, the boolean is the whole outcome. There is no
/// background reconnection: the sync engine calls `connect` explicitly
/// whenever it finds the link down.
#[async_trait]
pub trait Link: Send + Sync {
    /// Attempt association, updating the link state as it goes.
    async fn connect(&self, timeout: Duration) -> bool;

    /// Cheap status check, re-queried from the underlying link rather
    /// than cached indefinitely. May be slightly stale.
    async fn is_connected(&self) -> bool;

    /// Last observed link state.
    async fn state(&self) -> LinkState;
}
