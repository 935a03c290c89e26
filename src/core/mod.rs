pub mod calendar;
pub mod combo;
pub mod digits;
pub mod engine;
pub mod lunar;
pub mod matrix;
pub mod prompt;
pub mod world;

pub use crate::domain::model::{AnalysisReport, AnalysisRequest, WorldAnalysis};
pub use crate::domain::ports::{ConfigProvider, NarrativeRequest, NarrativeService};
pub use crate::utils::error::Result;
