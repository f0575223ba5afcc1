// storefront/src/pipeline/mod.rs

//! A small asynchronous step engine. Checkout, sign-in and sign-up are each
//! expressed as a `Pipeline` over their own context data.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod error;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Phase, Pipeline};
pub use error::PipelineError;
pub use step::{SkipCondition, StepDef};
