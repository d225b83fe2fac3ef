pub mod article;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod screening;
pub mod telemetry;

pub use article::Article;
pub use evaluator::{EvaluationResult, QualityEvaluator};
