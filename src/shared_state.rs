use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::estimate::EstimateResult;
use crate::session_mirror::SessionMirror;

/// Everything the handlers share. Handlers extract `State<Config>`,
/// `State<EstimatePanel>` or the full `SharedState` via `FromRef` — a
/// single `.with_state(shared)` covers all of them.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,
    pub panel: EstimatePanel,
    pub mirror: Arc<SessionMirror>,
    pub started_at: Instant,
}

impl SharedState {
    pub fn new(config: Config, mirror: Arc<SessionMirror>) -> Self {
        SharedState {
            config,
            panel: EstimatePanel::new(),
            mirror,
            started_at: Instant::now(),
        }
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Config {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for EstimatePanel {
    fn from_ref(shared: &SharedState) -> EstimatePanel {
        shared.panel.clone()
    }
}

/// Most recently published estimate, shared so the dashboard can re-read
/// it. Publishing is ticketed: a request takes a ticket before computing
/// and its result only lands if no newer ticket has published since —
/// a resubmission during the simulated delay abandons the older request.
#[derive(Clone, Default)]
pub struct EstimatePanel {
    latest: Arc<RwLock<Option<(u64, EstimateResult)>>>,
    next_ticket: Arc<AtomicU64>,
}

impl EstimatePanel {
    pub fn new() -> Self {
        EstimatePanel::default()
    }

    pub fn take_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Publish unless a newer ticket already has. Returns whether the
    /// result landed.
    pub fn publish(&self, ticket: u64, result: EstimateResult) -> bool {
        if let Ok(mut guard) = self.latest.write() {
            let newer = match guard.as_ref() {
                Some((current, _)) => *current < ticket,
                None => true,
            };
            if newer {
                *guard = Some((ticket, result));
            }
            newer
        } else {
            false
        }
    }

    pub fn latest(&self) -> Option<EstimateResult> {
        self.latest
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|(_, result)| result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimate::{EstimateInput, SystemType, UserSegment};
    use crate::services::estimate_engine::compute_estimate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn result(budget: f64) -> EstimateResult {
        let input = EstimateInput {
            location: "94105".to_string(),
            monthly_usage_kwh: 800.0,
            budget,
            system_type: SystemType::Solar,
            user_segment: UserSegment::Residential,
        };
        compute_estimate(&input, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn superseded_ticket_does_not_overwrite_newer_result() {
        let panel = EstimatePanel::new();
        let slow = panel.take_ticket();
        let fast = panel.take_ticket();

        // The resubmission lands first.
        assert!(panel.publish(fast, result(30_000.0)));
        // The abandoned original arrives late and is dropped.
        assert!(!panel.publish(slow, result(20_000.0)));

        let latest = panel.latest().unwrap();
        assert_eq!(latest.initial_cost, 30_000.0);
    }

    #[test]
    fn empty_panel_reports_nothing() {
        assert!(EstimatePanel::new().latest().is_none());
    }
}
