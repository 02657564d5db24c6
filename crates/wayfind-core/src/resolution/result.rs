use std::fmt;
use thiserror::Error;
use wayfind_common::workflow::{LocatorStrategy, StrategyKind};

/// Outcome of resolving a strategy list against a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found {
        /// Snapshot index of the matched node.
        index: u32,
        /// The strategy that matched.
        strategy: LocatorStrategy,
    },
    NotFound(NotFoundReason),
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    pub fn index(&self) -> Option<u32> {
        match self {
            Resolution::Found { index, .. } => Some(*index),
            Resolution::NotFound(_) => None,
        }
    }

    pub fn strategy(&self) -> Option<&LocatorStrategy> {
        match self {
            Resolution::Found { strategy, .. } => Some(strategy),
            Resolution::NotFound(_) => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Found { index, strategy } => write!(
                f,
                "Found element {} via {} '{}'",
                index, strategy.kind, strategy.value
            ),
            Resolution::NotFound(reason) => write!(f, "Not found: {}", reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotFoundReason {
    #[error("no snapshot available")]
    SnapshotUnavailable,

    #[error("step has no locator strategies")]
    NoStrategies,

    #[error("no element matched strategies {}", format_kinds(.0))]
    NoMatch(Vec<StrategyKind>),
}

fn format_kinds(kinds: &[StrategyKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
