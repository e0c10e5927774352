//! The analysis pipeline: fetch → classify → persist, driven by the
//! [`AnalysisOrchestrator`].

pub mod stages;

mod runner;
mod types;

pub use runner::AnalysisOrchestrator;
pub use types::{
    ClassificationFailure, ClassifiedRun, FetchedRun, PipelineError, RunReport, Stage,
};
