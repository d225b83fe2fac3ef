use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::extract::ExtractedMetrics;
use super::study_type::StudyType;
use crate::article::Article;

/// Base score per study design, in table order.
pub(crate) static STUDY_DESIGN_SCORES: [(StudyType, u8); 9] = [
    (StudyType::MetaAnalysis, 40),
    (StudyType::SystematicReview, 35),
    (StudyType::Rct, 30),
    (StudyType::CohortStudy, 20),
    (StudyType::CaseControl, 15),
    (StudyType::CrossSectional, 10),
    (StudyType::CaseReport, 5),
    (StudyType::Review, 25),
    (StudyType::Observational, 12),
];
const UNKNOWN_DESIGN_SCORE: u8 = 5;

/// Minimum |d| for a band; walked largest first.
pub(crate) struct EffectSizeBand {
    pub(crate) label: &'static str,
    pub(crate) minimum: f64,
    pub(crate) score: u8,
}

pub(crate) static EFFECT_SIZE_LADDER: [EffectSizeBand; 4] = [
    EffectSizeBand {
        label: "large",
        minimum: 0.8,
        score: 20,
    },
    EffectSizeBand {
        label: "medium",
        minimum: 0.5,
        score: 15,
    },
    EffectSizeBand {
        label: "small",
        minimum: 0.2,
        score: 10,
    },
    EffectSizeBand {
        label: "trivial",
        minimum: 0.0,
        score: 5,
    },
];
const MISSING_EFFECT_SIZE_SCORE: u8 = 5;

const SAMPLE_SIZE_BONUSES: [(u32, u8); 3] = [(10_000, 5), (1_000, 3), (100, 1)];
const POWER_ANALYSIS_BONUS: u8 = 2;
const HIGH_IMPACT_JOURNAL_BONUS: u8 = 3;

const POWER_ANALYSIS_NEGATIONS: [&str; 3] = [
    "no power analysis",
    "without power analysis",
    "lacked power analysis",
];
const POWER_ANALYSIS_TERMS: [&str; 4] = [
    "power analysis",
    "statistical power",
    "power calculation",
    "sample size calculation",
];

const PRACTICAL_INDICATORS: [(&str, &[&str]); 4] = [
    ("immediate", &["immediate", "instant", "quick", "simple", "easy"]),
    ("accessible", &["accessible", "free", "no cost", "low cost"]),
    (
        "specific",
        &["protocol", "procedure", "step-by-step", "guide", "method"],
    ),
    (
        "measurable",
        &["measure", "assess", "evaluate", "track", "monitor"],
    ),
];
const PRACTICAL_CATEGORY_POINTS: i16 = 5;
const PRACTICE_BARRIERS: [&str; 5] = [
    "expensive",
    "complex",
    "professional only",
    "clinical setting",
    "specialized",
];
const BARRIER_PENALTY: i16 = 3;
const INTERVENTION_TERMS: [&str; 4] = ["intervention", "treatment", "therapy", "training"];
const INTERVENTION_BONUS: i16 = 3;

const SAFETY_REASSURANCE_TERMS: [&str; 5] = [
    "safe",
    "no adverse",
    "well-tolerated",
    "no side effects",
    "minimal risk",
];
const SAFETY_RISK_TERMS: [&str; 5] = [
    "risk",
    "adverse",
    "caution",
    "contraindication",
    "side effect",
];

/// Age buckets in days, newest first.
const RECENCY_BUCKETS: [(i64, u8); 3] = [(365, 10), (1_095, 7), (1_825, 5)];
const STALE_RECENCY_SCORE: u8 = 3;
const UNDATED_RECENCY_SCORE: u8 = 5;

/// The five scoring dimensions, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    StudyQuality,
    EffectSize,
    PracticalApplicability,
    Safety,
    Recency,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 5] = [
        ScoreDimension::StudyQuality,
        ScoreDimension::EffectSize,
        ScoreDimension::PracticalApplicability,
        ScoreDimension::Safety,
        ScoreDimension::Recency,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ScoreDimension::StudyQuality => "study_quality",
            ScoreDimension::EffectSize => "effect_size",
            ScoreDimension::PracticalApplicability => "practical_applicability",
            ScoreDimension::Safety => "safety",
            ScoreDimension::Recency => "recency",
        }
    }

    /// Inclusive score range for the dimension.
    pub fn bounds(&self) -> (u8, u8) {
        match self {
            ScoreDimension::StudyQuality => (0, 40),
            ScoreDimension::EffectSize => (5, 20),
            ScoreDimension::PracticalApplicability => (0, 20),
            ScoreDimension::Safety => (5, 10),
            ScoreDimension::Recency => (3, 10),
        }
    }
}

/// Per-dimension scores. Serializes as an object keyed by dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub study_quality: u8,
    pub effect_size: u8,
    pub practical_applicability: u8,
    pub safety: u8,
    pub recency: u8,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: ScoreDimension) -> u8 {
        match dimension {
            ScoreDimension::StudyQuality => self.study_quality,
            ScoreDimension::EffectSize => self.effect_size,
            ScoreDimension::PracticalApplicability => self.practical_applicability,
            ScoreDimension::Safety => self.safety,
            ScoreDimension::Recency => self.recency,
        }
    }

    pub fn entries(&self) -> [(ScoreDimension, u8); 5] {
        ScoreDimension::ALL.map(|dimension| (dimension, self.get(dimension)))
    }

    pub fn total(&self) -> u16 {
        self.entries()
            .iter()
            .map(|(_, score)| u16::from(*score))
            .sum()
    }
}

/// Inputs shared by every dimension scorer.
pub(crate) struct ScoringContext<'a> {
    pub(crate) article: &'a Article,
    pub(crate) study_type: StudyType,
    pub(crate) metrics: &'a ExtractedMetrics,
    pub(crate) high_impact_journals: &'a [String],
    pub(crate) today: NaiveDate,
}

pub(crate) fn score_article(context: &ScoringContext<'_>) -> ScoreBreakdown {
    let body = context.article.body_text().to_lowercase();
    let full_text = context.article.full_text().to_lowercase();

    ScoreBreakdown {
        study_quality: study_quality(context, &body),
        effect_size: effect_size_score(context.metrics.effect_size),
        practical_applicability: practical_applicability(&full_text),
        safety: safety(&body),
        recency: recency(context.article.published_date(), context.today),
    }
}

fn study_quality(context: &ScoringContext<'_>, body: &str) -> u8 {
    let (_, max) = ScoreDimension::StudyQuality.bounds();
    let mut score = design_score(context.study_type);

    if let Some(size) = context.metrics.sample_size {
        if let Some((_, bonus)) = SAMPLE_SIZE_BONUSES
            .iter()
            .find(|(minimum, _)| size >= *minimum)
        {
            score += bonus;
        }
    }

    if has_power_analysis(body) {
        score += POWER_ANALYSIS_BONUS;
    }

    if is_high_impact_journal(context.article.journal(), context.high_impact_journals) {
        score += HIGH_IMPACT_JOURNAL_BONUS;
    }

    score.min(max)
}

pub(crate) fn design_score(study_type: StudyType) -> u8 {
    STUDY_DESIGN_SCORES
        .iter()
        .find(|(design, _)| *design == study_type)
        .map(|(_, score)| *score)
        .unwrap_or(UNKNOWN_DESIGN_SCORE)
}

pub(crate) fn effect_size_score(effect_size: Option<f64>) -> u8 {
    let Some(d) = effect_size else {
        return MISSING_EFFECT_SIZE_SCORE;
    };
    effect_size_band(d)
        .map(|band| band.score)
        .unwrap_or(MISSING_EFFECT_SIZE_SCORE)
}

pub(crate) fn effect_size_band(d: f64) -> Option<&'static EffectSizeBand> {
    let magnitude = d.abs();
    EFFECT_SIZE_LADDER
        .iter()
        .find(|band| magnitude >= band.minimum)
}

pub(crate) fn practical_applicability(full_text: &str) -> u8 {
    let (min, max) = ScoreDimension::PracticalApplicability.bounds();

    let categories = PRACTICAL_INDICATORS
        .iter()
        .filter(|(_, keywords)| contains_any(full_text, keywords))
        .count() as i16;
    let barriers = PRACTICE_BARRIERS
        .iter()
        .filter(|barrier| full_text.contains(*barrier))
        .count() as i16;

    let mut score = categories * PRACTICAL_CATEGORY_POINTS - barriers * BARRIER_PENALTY;
    if contains_any(full_text, &INTERVENTION_TERMS) {
        score += INTERVENTION_BONUS;
    }

    score.clamp(i16::from(min), i16::from(max)) as u8
}

pub(crate) fn safety(body: &str) -> u8 {
    if contains_any(body, &SAFETY_REASSURANCE_TERMS) {
        10
    } else if contains_any(body, &SAFETY_RISK_TERMS) {
        5
    } else {
        7
    }
}

pub(crate) fn recency(published_date: Option<&str>, today: NaiveDate) -> u8 {
    let Some(published) =
        published_date.and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    else {
        return UNDATED_RECENCY_SCORE;
    };

    let age_days = (today - published).num_days();
    RECENCY_BUCKETS
        .iter()
        .find(|(max_age, _)| age_days <= *max_age)
        .map(|(_, score)| *score)
        .unwrap_or(STALE_RECENCY_SCORE)
}

/// Negated mentions ("no power analysis") override any positive term.
pub(crate) fn has_power_analysis(body: &str) -> bool {
    if contains_any(body, &POWER_ANALYSIS_NEGATIONS) {
        return false;
    }
    contains_any(body, &POWER_ANALYSIS_TERMS)
}

pub(crate) fn is_high_impact_journal(journal: &str, allow_list: &[String]) -> bool {
    let journal = journal.to_lowercase();
    allow_list.iter().any(|venue| journal.contains(venue.as_str()))
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
