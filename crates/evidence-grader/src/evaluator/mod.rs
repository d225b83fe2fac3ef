mod extract;
mod policy;
mod rules;
mod study_type;

#[cfg(test)]
mod tests;

pub use extract::{
    confidence_interval, correlation_to_d, effect_size, follow_up_period, odds_ratio_to_d,
    p_value, sample_size, study_duration, ExtractedMetrics, MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE,
};
pub use policy::{EvidenceLevel, Recommendation};
pub use rules::{ScoreBreakdown, ScoreDimension};
pub use study_type::{classify, StudyType};

use chrono::{Local, NaiveDate};
use rules::{effect_size_band, score_article, ScoringContext};
use serde::Serialize;
use tracing::debug;

use crate::article::Article;

/// Venues whose publications earn the high-impact bonus.
pub const DEFAULT_HIGH_IMPACT_JOURNALS: [&str; 9] = [
    "nature",
    "science",
    "cell",
    "lancet",
    "new england journal",
    "psychological science",
    "journal of personality and social psychology",
    "psychological bulletin",
    "annual review",
];

/// Tunable inputs to the grader that are fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub high_impact_journals: Vec<String>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            high_impact_journals: default_high_impact_journals(),
        }
    }
}

fn default_high_impact_journals() -> Vec<String> {
    DEFAULT_HIGH_IMPACT_JOURNALS
        .iter()
        .map(|venue| venue.to_string())
        .collect()
}

/// Stateless grader; safe to share across threads.
#[derive(Debug, Clone)]
pub struct QualityEvaluator {
    high_impact_journals: Vec<String>,
}

impl QualityEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        let high_impact_journals = config
            .high_impact_journals
            .into_iter()
            .map(|venue| venue.trim().to_lowercase())
            .filter(|venue| !venue.is_empty())
            .collect();
        Self {
            high_impact_journals,
        }
    }

    /// Grades an article as of today's local date.
    pub fn evaluate(&self, article: &Article) -> EvaluationResult {
        self.evaluate_on(article, Local::now().date_naive())
    }

    /// Grades an article with recency measured against `today`.
    pub fn evaluate_on(&self, article: &Article, today: NaiveDate) -> EvaluationResult {
        let study_type = classify(article);
        let metrics = ExtractedMetrics::from_text(&article.body_text());

        let breakdown = score_article(&ScoringContext {
            article,
            study_type,
            metrics: &metrics,
            high_impact_journals: &self.high_impact_journals,
            today,
        });
        let total_score = breakdown.total();
        let evidence_level = EvidenceLevel::resolve(study_type, total_score);
        let recommendation = Recommendation::for_score(total_score);

        debug!(
            title = article.title(),
            study_type = study_type.label(),
            sample_size = ?metrics.sample_size,
            effect_band = ?metrics.effect_size.and_then(effect_size_band).map(|band| band.label),
            ?breakdown,
            total_score,
            evidence_level = evidence_level.label(),
            "article graded"
        );

        let ExtractedMetrics {
            sample_size,
            effect_size,
            p_value,
            confidence_interval,
            study_duration,
            follow_up_period,
        } = metrics;

        EvaluationResult {
            total_score,
            breakdown,
            evidence_level,
            study_type,
            sample_size,
            effect_size,
            recommendation,
            details: EvaluationDetails {
                p_value,
                confidence_interval,
                study_duration,
                follow_up_period,
            },
        }
    }
}

impl Default for QualityEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl From<EvaluatorConfig> for QualityEvaluator {
    fn from(config: EvaluatorConfig) -> Self {
        Self::new(config)
    }
}

/// Secondary metrics reported alongside the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationDetails {
    pub p_value: Option<f64>,
    pub confidence_interval: Option<[f64; 2]>,
    pub study_duration: Option<String>,
    pub follow_up_period: Option<String>,
}

/// Immutable grading outcome for a single article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    total_score: u16,
    breakdown: ScoreBreakdown,
    evidence_level: EvidenceLevel,
    study_type: StudyType,
    sample_size: Option<u32>,
    effect_size: Option<f64>,
    recommendation: Recommendation,
    details: EvaluationDetails,
}

impl EvaluationResult {
    pub fn total_score(&self) -> u16 {
        self.total_score
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    pub fn evidence_level(&self) -> EvidenceLevel {
        self.evidence_level
    }

    pub fn study_type(&self) -> StudyType {
        self.study_type
    }

    pub fn sample_size(&self) -> Option<u32> {
        self.sample_size
    }

    pub fn effect_size(&self) -> Option<f64> {
        self.effect_size
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn details(&self) -> &EvaluationDetails {
        &self.details
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary::from(self)
    }
}

/// Downstream view of a result: the keys consumed by summarization and the site dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub total_score: u16,
    pub breakdown: ScoreBreakdown,
    pub evidence_level: EvidenceLevel,
    pub study_type: StudyType,
    pub sample_size: Option<u32>,
    pub effect_size: Option<f64>,
    pub recommendation: Recommendation,
}

impl From<&EvaluationResult> for EvaluationSummary {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            total_score: result.total_score,
            breakdown: result.breakdown,
            evidence_level: result.evidence_level,
            study_type: result.study_type,
            sample_size: result.sample_size,
            effect_size: result.effect_size,
            recommendation: result.recommendation,
        }
    }
}
