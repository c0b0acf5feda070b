//! Controller layer: UI events, the workflow state machine, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod workflow;

pub use events::{Generation, Notification, Severity, UiEvent};
pub use workflow::{WorkflowController, WorkflowKind, WorkflowState};
