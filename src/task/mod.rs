//! Task module - request model, task snapshots, registry and orchestration

pub mod model;
pub mod orchestrator;
pub mod registry;
pub mod request;

pub use model::{PipelineOutcome, Stage, Task};
pub use orchestrator::{Orchestrator, PipelineConfig};
pub use registry::TaskRegistry;
pub use request::{GenerationRequest, Industry};
