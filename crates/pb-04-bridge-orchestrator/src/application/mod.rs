pub mod orchestrator;
pub mod pipeline;

pub use orchestrator::BridgeOrchestrator;
pub use pipeline::BlockPipeline;
