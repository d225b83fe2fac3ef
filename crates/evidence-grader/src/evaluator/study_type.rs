use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::article::Article;

/// Study design recognised in an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyType {
    #[serde(rename = "meta-analysis")]
    MetaAnalysis,
    #[serde(rename = "systematic review")]
    SystematicReview,
    #[serde(rename = "rct")]
    Rct,
    #[serde(rename = "cohort study")]
    CohortStudy,
    #[serde(rename = "case-control")]
    CaseControl,
    #[serde(rename = "cross-sectional")]
    CrossSectional,
    #[serde(rename = "case report")]
    CaseReport,
    #[serde(rename = "review")]
    Review,
    #[default]
    #[serde(rename = "observational")]
    Observational,
}

impl StudyType {
    pub fn label(&self) -> &'static str {
        match self {
            StudyType::MetaAnalysis => "meta-analysis",
            StudyType::SystematicReview => "systematic review",
            StudyType::Rct => "rct",
            StudyType::CohortStudy => "cohort study",
            StudyType::CaseControl => "case-control",
            StudyType::CrossSectional => "cross-sectional",
            StudyType::CaseReport => "case report",
            StudyType::Review => "review",
            StudyType::Observational => "observational",
        }
    }
}

impl fmt::Display for StudyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered design rules; the generic `review` rule must stay after both
/// review-flavoured designs because its pattern also matches them.
static DESIGN_RULES: LazyLock<Vec<(StudyType, Regex)>> = LazyLock::new(|| {
    [
        (
            StudyType::MetaAnalysis,
            r"meta-?analys[ie]s|systematic review and meta|meta analysis",
        ),
        (
            StudyType::SystematicReview,
            r"systematic review|cochrane review",
        ),
        (
            StudyType::Rct,
            r"randomi[sz]ed controlled trial|rct|randomi[sz]ed trial|clinical trial",
        ),
        (
            StudyType::CohortStudy,
            r"cohort study|prospective study|longitudinal study",
        ),
        (StudyType::CaseControl, r"case-?control study"),
        (StudyType::CrossSectional, r"cross-?sectional|survey study"),
        (StudyType::CaseReport, r"case report|case study"),
        (StudyType::Review, r"review|narrative review"),
    ]
    .into_iter()
    .map(|(study_type, pattern)| {
        (
            study_type,
            Regex::new(pattern).expect("study design pattern compiles"),
        )
    })
    .collect()
});

/// Classifies the study design, trusting structured publication types over prose.
pub fn classify(article: &Article) -> StudyType {
    let tags = article.publication_types_text().to_lowercase();
    let text = article.full_text().to_lowercase();

    match_design(&tags)
        .or_else(|| match_design(&text))
        .unwrap_or_default()
}

fn match_design(text: &str) -> Option<StudyType> {
    if text.trim().is_empty() {
        return None;
    }

    DESIGN_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(study_type, _)| *study_type)
}
