pub mod engine;
pub mod matcher;
pub mod result;

pub use engine::ElementResolver;
pub use matcher::{node_role, similarity, strategy_matches};
pub use result::{NotFoundReason, Resolution};
