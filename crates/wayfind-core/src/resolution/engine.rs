use super::matcher::strategy_matches;
use super::result::{NotFoundReason, Resolution};
use crate::config::ResolutionConfig;
use crate::synthesis::strategies::{DEFAULT_FUZZY_THRESHOLD, sort_by_priority};

use tracing::{debug, warn};
use wayfind_common::error::ModelError;
use wayfind_common::protocol::DomSnapshot;
use wayfind_common::workflow::{LocatorStrategy, WorkflowDefinition};

/// Replays locator strategies against a page snapshot.
///
/// Strategies are tried in priority order. For each strategy the nodes are
/// scanned in snapshot order and the first match wins, so the same inputs
/// always resolve to the same node.
#[derive(Debug, Clone)]
pub struct ElementResolver {
    default_threshold: f64,
}

impl Default for ElementResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl ElementResolver {
    /// `default_threshold` applies to fuzzy strategies that carry no threshold of their own.
    pub fn new(default_threshold: f64) -> Self {
        Self { default_threshold }
    }

    pub fn from_config(config: &ResolutionConfig) -> Self {
        Self::new(config.default_fuzzy_threshold)
    }

    pub fn resolve(
        &self,
        strategies: &[LocatorStrategy],
        snapshot: Option<&DomSnapshot>,
    ) -> Resolution {
        let Some(snapshot) = snapshot else {
            warn!("Cannot resolve element: no snapshot available");
            return Resolution::NotFound(NotFoundReason::SnapshotUnavailable);
        };

        if strategies.is_empty() {
            warn!("Cannot resolve element: no strategies");
            return Resolution::NotFound(NotFoundReason::NoStrategies);
        }

        let mut ordered = strategies.to_vec();
        sort_by_priority(&mut ordered);

        for strategy in &ordered {
            debug!(kind = %strategy.kind, value = %strategy.value, "Trying strategy");
            if let Some(node) = snapshot
                .iter()
                .find(|node| strategy_matches(strategy, node, self.default_threshold))
            {
                debug!(index = node.index, kind = %strategy.kind, "Strategy matched");
                return Resolution::Found {
                    index: node.index,
                    strategy: strategy.clone(),
                };
            }
        }

        let attempted = ordered.iter().map(|s| s.kind).collect::<Vec<_>>();
        warn!(
            strategies = attempted.len(),
            nodes = snapshot.len(),
            "No element matched any strategy"
        );
        Resolution::NotFound(NotFoundReason::NoMatch(attempted))
    }

    /// Resolve the target of one workflow step.
    pub fn resolve_step(
        &self,
        workflow: &WorkflowDefinition,
        step_index: usize,
        snapshot: Option<&DomSnapshot>,
    ) -> Result<Resolution, ModelError> {
        let strategies = workflow.step_strategies(step_index)?;
        Ok(self.resolve(strategies, snapshot))
    }
}
