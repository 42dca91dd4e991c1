use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rega_core::{RemoteFailure, RemoteOutcome, SensorSnapshot};
use tracing::{debug, info, warn};

use crate::cloud::Cloud;
use crate::link::Link;

/// The only state the node carries across cycles.
///
/// Registration starts pending at boot and is a hard prerequisite:
/// telemetry and decision work mean nothing until it has cleared.
/// The sampling trigger re-arms telemetry and decision together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncFlags {
    pub needs_registration: bool,
    pub needs_telemetry_push: bool,
    pub needs_decision_check: bool,
}

impl SyncFlags {
    pub fn at_boot() -> Self {
        Self {
            needs_registration: true,
            needs_telemetry_push: false,
            needs_decision_check: false,
        }
    }

    /// Called by the sampling trigger after a fresh snapshot.
    pub fn mark_sampled(&mut self) {
        self.needs_telemetry_push = true;
        self.needs_decision_check = true;
    }

    /// Pending work in fixed priority order: registration, then
    /// telemetry, then decision check.
    pub fn plan(&self) -> Vec<PendingAction> {
        let mut plan = Vec::with_capacity(3);
        if self.needs_registration {
            plan.push(PendingAction::Register);
        }
        if self.needs_telemetry_push {
            plan.push(PendingAction::PushTelemetry);
        }
        if self.needs_decision_check {
            plan.push(PendingAction::FetchDecision);
        }
        plan
    }
}

/// One unit of remote work the engine may attempt in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Register,
    PushTelemetry,
    FetchDecision,
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PendingAction::Register => "register",
            PendingAction::PushTelemetry => "push-telemetry",
            PendingAction::FetchDecision => "fetch-decision",
        };
        f.write_str(s)
    }
}

/// How a single executed step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// 2xx from the service.
    Accepted { status: u16 },
    /// An HTTP response outside 2xx; remote-level failure.
    Rejected { status: u16 },
    /// No usable response at all.
    Failed(RemoteFailure),
}

impl StepResult {
    fn from_outcome<T>(outcome: &RemoteOutcome<T>) -> Self {
        match outcome {
            RemoteOutcome::Ok { status, .. } if outcome.accepted() => {
                StepResult::Accepted { status: *status }
            }
            RemoteOutcome::Ok { status, .. } => StepResult::Rejected { status: *status },
            RemoteOutcome::Failed(reason) => StepResult::Failed(*reason),
        }
    }

    pub fn accepted(&self) -> bool {
        matches!(self, StepResult::Accepted { .. })
    }
}

/// What one engine cycle did, for logging and the decision pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Whether the link was up (or came up) this cycle.
    pub link_up: bool,
    /// Steps attempted this cycle, in execution order.
    pub steps: Vec<(PendingAction, StepResult)>,
    /// Remote irrigation boolean, when this cycle's decision check
    /// succeeded with a decoded payload.
    pub remote_decision: Option<bool>,
}

impl CycleReport {
    fn offline() -> Self {
        Self {
            link_up: false,
            steps: Vec::new(),
            remote_decision: None,
        }
    }

    pub fn attempted(&self, action: PendingAction) -> bool {
        self.steps.iter().any(|(a, _)| *a == action)
    }
}

/// Orchestrates the per-cycle remote work.
///
/// Evaluated as a guarded plan: the flags translate into an ordered list
/// of pending actions, executed stepwise with at most one call per flag.
/// A failed step aborts the remainder of the cycle outright; later
/// actions are not attempted at all this pass. Flag transitions follow
/// the outcome of each step, and a telemetry rejection re-arms
/// registration on the suspicion that it has lapsed.
pub struct SyncEngine {
    cloud: Arc<dyn Cloud>,
    link: Arc<dyn Link>,
    connect_timeout: Duration,
    flags: SyncFlags,
}

impl SyncEngine {
    pub fn new(cloud: Arc<dyn Cloud>, link: Arc<dyn Link>, connect_timeout: Duration) -> Self {
        Self {
            cloud,
            link,
            connect_timeout,
            flags: SyncFlags::at_boot(),
        }
    }

    pub fn flags(&self) -> SyncFlags {
        self.flags
    }

    /// Re-arm telemetry and decision work after a fresh snapshot.
    pub fn mark_sampled(&mut self) {
        self.flags.mark_sampled();
    }

    /// Run one sync cycle against the latest snapshot.
    ///
    /// With the link down, one connect attempt is made; if it fails the
    /// cycle aborts with all flags untouched. The snapshot is only
    /// needed for telemetry and decision steps, so registration can
    /// proceed before the first sample exists.
    pub async fn run_cycle(&mut self, snapshot: Option<&SensorSnapshot>) -> CycleReport {
        if !self.link.is_connected().await {
            debug!("Link down, attempting connect");
            if !self.link.connect(self.connect_timeout).await {
                return CycleReport::offline();
            }
        }

        let mut report = CycleReport {
            link_up: true,
            steps: Vec::new(),
            remote_decision: None,
        };

        for action in self.flags.plan() {
            let result = match action {
                PendingAction::Register => self.step_register().await,
                PendingAction::PushTelemetry => {
                    let Some(snapshot) = snapshot else { break };
                    self.step_telemetry(snapshot).await
                }
                PendingAction::FetchDecision => {
                    let Some(snapshot) = snapshot else { break };
                    self.step_decision(snapshot, &mut report.remote_decision).await
                }
            };

            let ok = result.accepted();
            report.steps.push((action, result));
            if !ok {
                break;
            }
        }

        report
    }

    async fn step_register(&mut self) -> StepResult {
        let outcome = self.cloud.register().await;
        let result = StepResult::from_outcome(&outcome);
        if result.accepted() {
            self.flags.needs_registration = false;
            info!("Registered with decision service");
        } else {
            warn!(?result, "Registration not accepted, will retry");
        }
        result
    }

    async fn step_telemetry(&mut self, snapshot: &SensorSnapshot) -> StepResult {
        let outcome = self.cloud.push_telemetry(snapshot).await;
        let result = StepResult::from_outcome(&outcome);
        if result.accepted() {
            self.flags.needs_telemetry_push = false;
            debug!("Telemetry accepted");
        } else {
            // A rejected push suggests the registration lapsed; force
            // re-registration before anything else is attempted.
            self.flags.needs_registration = true;
            warn!(?result, "Telemetry push failed, re-arming registration");
        }
        result
    }

    async fn step_decision(
        &mut self,
        snapshot: &SensorSnapshot,
        remote_decision: &mut Option<bool>,
    ) -> StepResult {
        let outcome = self.cloud.fetch_decision(snapshot).await;
        let result = StepResult::from_outcome(&outcome);
        match &outcome {
            RemoteOutcome::Ok {
                payload: Some(resp),
                ..
            } if outcome.accepted() => {
                self.flags.needs_decision_check = false;
                *remote_decision = Some(resp.irrigar);
                info!(irrigate = resp.irrigar, "Remote irrigation decision received");
            }
            _ => {
                // Unlike telemetry, a failed decision check does not
                // question the registration; the flag just stays set.
                warn!(?result, "Decision check failed, will retry");
            }
        }
        result
    }
}
