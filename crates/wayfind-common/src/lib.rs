pub mod error;
pub mod protocol;
pub mod workflow;

pub use error::ModelError;
pub use protocol::{ActionRecord, CapturedElement, DomNode, DomSnapshot, RawElement, RecordedTrace};
pub use workflow::{
    ClickStep, ElementTarget, ExtractStep, HistoryStep, InputDefinition, InputStep, KeyPressStep,
    LocatorStrategy, NavigationStep, ScrollStep, StepContext, StrategyKind, WorkflowDefinition,
    WorkflowStep,
};
