use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::study_type::StudyType;

/// Three-tier grade summarizing how far a study's conclusions can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceLevel {
    Gold,
    Silver,
    Bronze,
}

impl EvidenceLevel {
    const SYNTHESIS_GOLD_CUTOFF: u16 = 80;
    const RCT_GOLD_CUTOFF: u16 = 75;
    const SILVER_CUTOFF: u16 = 70;

    /// Gold requires a strong design as well as a high score; silver only the score.
    pub fn resolve(study_type: StudyType, total_score: u16) -> Self {
        match study_type {
            StudyType::MetaAnalysis | StudyType::SystematicReview
                if total_score >= Self::SYNTHESIS_GOLD_CUTOFF =>
            {
                EvidenceLevel::Gold
            }
            StudyType::Rct if total_score >= Self::RCT_GOLD_CUTOFF => EvidenceLevel::Gold,
            _ if total_score >= Self::SILVER_CUTOFF => EvidenceLevel::Silver,
            _ => EvidenceLevel::Bronze,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvidenceLevel::Gold => "gold",
            EvidenceLevel::Silver => "silver",
            EvidenceLevel::Bronze => "bronze",
        }
    }
}

impl fmt::Display for EvidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reader-facing recommendation tier derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    StronglyRecommended,
    Recommended,
    ConditionallyRecommended,
    NotRecommended,
}

impl Recommendation {
    pub fn for_score(total_score: u16) -> Self {
        match total_score {
            80.. => Recommendation::StronglyRecommended,
            70..=79 => Recommendation::Recommended,
            60..=69 => Recommendation::ConditionallyRecommended,
            _ => Recommendation::NotRecommended,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::StronglyRecommended => "Strongly recommended - high-quality evidence",
            Recommendation::Recommended => "Recommended - sufficient evidence",
            Recommendation::ConditionallyRecommended => {
                "Conditionally recommended - limited evidence"
            }
            Recommendation::NotRecommended => "Not recommended - insufficient evidence",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}
