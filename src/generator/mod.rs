pub mod agents;
pub mod context;
pub mod memory;
pub mod orchestrator;
pub mod outlet;
pub mod runner;
pub mod runtime;
#[cfg(test)]
pub mod testing;
pub mod types;
pub mod workflow;
