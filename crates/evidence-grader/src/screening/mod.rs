//! Batch screening: grade collected articles, keep those above the
//! publication threshold, and rank them for the downstream summarizer.

mod router;

pub use router::screening_router;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::article::{deduplicate, Article};
use crate::config::ScreeningConfig;
use crate::evaluator::{EvaluationResult, EvaluationSummary, QualityEvaluator};

/// An article paired with the downstream view of its grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub evaluation: EvaluationSummary,
}

/// Outcome of screening one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub evaluated_on: NaiveDate,
    pub threshold: u16,
    pub received: usize,
    pub duplicates: usize,
    pub rejected: usize,
    /// Passing articles, highest score first.
    pub passed: Vec<ScoredArticle>,
}

impl ScreeningReport {
    /// The best `limit` articles, as handed to summarization.
    pub fn top(&self, limit: usize) -> &[ScoredArticle] {
        &self.passed[..limit.min(self.passed.len())]
    }
}

/// Applies the grader to batches of collected articles.
pub struct ScreeningPipeline {
    evaluator: Arc<QualityEvaluator>,
    config: ScreeningConfig,
}

impl ScreeningPipeline {
    pub fn new(evaluator: Arc<QualityEvaluator>, config: ScreeningConfig) -> Self {
        Self { evaluator, config }
    }

    pub fn config(&self) -> ScreeningConfig {
        self.config
    }

    pub fn with_threshold(&self, threshold: u16) -> Self {
        Self {
            evaluator: Arc::clone(&self.evaluator),
            config: ScreeningConfig {
                threshold,
                ..self.config
            },
        }
    }

    pub fn evaluate(&self, article: &Article, today: Option<NaiveDate>) -> EvaluationResult {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        self.evaluator.evaluate_on(article, today)
    }

    pub fn screen(&self, articles: Vec<Article>, today: Option<NaiveDate>) -> ScreeningReport {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let received = articles.len();
        let unique = deduplicate(articles);
        let duplicates = received - unique.len();

        let mut passed = Vec::new();
        let mut rejected = 0;
        for article in unique {
            let result = self.evaluator.evaluate_on(&article, today);
            if result.total_score() >= self.config.threshold {
                passed.push(ScoredArticle {
                    evaluation: result.summary(),
                    article,
                });
            } else {
                debug!(
                    title = article.title(),
                    total_score = result.total_score(),
                    "article below screening threshold"
                );
                rejected += 1;
            }
        }

        passed.sort_by(|a, b| b.evaluation.total_score.cmp(&a.evaluation.total_score));

        info!(
            received,
            duplicates,
            rejected,
            passed = passed.len(),
            threshold = self.config.threshold,
            "screened article batch"
        );

        ScreeningReport {
            evaluated_on: today,
            threshold: self.config.threshold,
            received,
            duplicates,
            rejected,
            passed,
        }
    }
}
