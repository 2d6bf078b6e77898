//! # Orchestration
//!
//! Per-workflow context propagation and the pipeline stages that run against it.
//!
//! ## Core Components
//!
//! - **OrchestrationContext**: Ordered workflow variables owned by one workflow instance
//! - **PipelineStage**: Read inputs, do work, write outputs, report an outcome
//! - **StageRunner**: Converts a stage's result into the outcome variables at the stage boundary
//! - **DependencyResolver**: All-or-nothing check of declared dependencies against running instances
//! - **DecomposePackageStage**: Descriptor lookup, rule projection and dependency enforcement
//! - **InputParametersStage**: Normalises the inputs each request action reads
//!
//! The external scheduler creates the context, runs the stages in order through
//! a [`StageRunner`], inspects `process_flow_result` after each one and owns
//! retry. Stages hold no mutable state, so one stage value can serve many
//! workflow instances concurrently.

pub mod context;
pub mod dependency_resolver;
pub mod stage;
pub mod stage_runner;
pub mod stages;

pub use context::OrchestrationContext;
pub use dependency_resolver::DependencyResolver;
pub use stage::{PipelineStage, StageOutcome, StageStatus};
pub use stage_runner::{StageExecutionResult, StageRunner};
pub use stages::{
    DecomposePackageStage, DecompositionReport, DecompositionState, InputParametersStage,
    RequestAction,
};
