use super::common::*;
use crate::article::Article;
use crate::evaluator::rules::{
    design_score, effect_size_score, has_power_analysis, is_high_impact_journal,
    practical_applicability, recency, safety,
};
use crate::evaluator::{EvaluatorConfig, QualityEvaluator, ScoreDimension, StudyType};

fn default_journals() -> Vec<String> {
    EvaluatorConfig::default().high_impact_journals
}

#[test]
fn design_table_scores_each_study_type() {
    let expected = [
        (StudyType::MetaAnalysis, 40),
        (StudyType::SystematicReview, 35),
        (StudyType::Rct, 30),
        (StudyType::Review, 25),
        (StudyType::CohortStudy, 20),
        (StudyType::CaseControl, 15),
        (StudyType::Observational, 12),
        (StudyType::CrossSectional, 10),
        (StudyType::CaseReport, 5),
    ];
    for (study_type, score) in expected {
        assert_eq!(design_score(study_type), score, "{study_type}");
    }
}

#[test]
fn effect_size_ladder_uses_minimum_thresholds() {
    assert_eq!(effect_size_score(None), 5);
    assert_eq!(effect_size_score(Some(0.8)), 20);
    assert_eq!(effect_size_score(Some(-0.85)), 20);
    assert_eq!(effect_size_score(Some(0.79)), 15);
    assert_eq!(effect_size_score(Some(0.5)), 15);
    assert_eq!(effect_size_score(Some(0.2)), 10);
    assert_eq!(effect_size_score(Some(0.1)), 5);
    assert_eq!(effect_size_score(Some(0.0)), 5);
}

#[test]
fn applicability_counts_categories_barriers_and_interventions() {
    assert_eq!(
        practical_applicability("a simple, free protocol to track mood during therapy"),
        20
    );
    assert_eq!(practical_applicability("a simple routine"), 5);
    assert_eq!(practical_applicability("a simple but expensive routine"), 2);
    assert_eq!(
        practical_applicability("expensive, complex and specialized equipment"),
        0
    );
    assert_eq!(practical_applicability("a training programme"), 3);
    assert_eq!(practical_applicability(""), 0);
}

#[test]
fn repeated_barrier_counts_once() {
    assert_eq!(
        practical_applicability("a simple method, though expensive and expensive again"),
        7
    );
}

#[test]
fn safety_prefers_reassurance_over_risk() {
    assert_eq!(
        safety("the intervention was safe with no adverse effects reported."),
        10
    );
    assert_eq!(safety("several adverse effects and risks were reported."), 5);
    assert_eq!(safety("mood improved across sessions."), 7);
    assert_eq!(safety("minimal risk despite earlier caution"), 10);
}

#[test]
fn recency_buckets_by_age() {
    let cases = [
        (30, 10),
        (365, 10),
        (366, 7),
        (1_095, 7),
        (1_096, 5),
        (1_825, 5),
        (2_000, 3),
        (-10, 10),
    ];
    for (age, expected) in cases {
        let published = days_ago(age);
        assert_eq!(
            recency(Some(published.as_str()), today()),
            expected,
            "age {age}"
        );
    }
}

#[test]
fn recency_defaults_when_date_is_missing_or_malformed() {
    assert_eq!(recency(None, today()), 5);
    assert_eq!(recency(Some("01/02/2024"), today()), 5);
    assert_eq!(recency(Some(""), today()), 5);
}

#[test]
fn power_analysis_negation_wins() {
    assert!(has_power_analysis("power analysis indicated adequate sample size."));
    assert!(has_power_analysis("a sample size calculation preceded recruitment"));
    assert!(!has_power_analysis("no power analysis mentioned."));
    assert!(!has_power_analysis(
        "statistical power was discussed, although the study lacked power analysis"
    ));
    assert!(!has_power_analysis("participants were randomised"));
}

#[test]
fn journal_allow_list_matches_substrings() {
    let journals = default_journals();
    assert!(is_high_impact_journal("Psychological Science", &journals));
    assert!(is_high_impact_journal("The Lancet Psychiatry", &journals));
    assert!(!is_high_impact_journal("Unknown Journal", &journals));
    assert!(!is_high_impact_journal("", &journals));
}

#[test]
fn custom_journal_list_is_normalized() {
    let evaluator = QualityEvaluator::new(EvaluatorConfig {
        high_impact_journals: vec!["  Behaviour Research and Therapy ".to_string()],
    });
    let article = Article {
        journal: Some("Behaviour Research and Therapy".to_string()),
        ..Article::default()
    };
    let baseline = Article {
        journal: Some("Psychological Science".to_string()),
        ..Article::default()
    };

    let boosted = evaluator.evaluate_on(&article, today());
    let plain = evaluator.evaluate_on(&baseline, today());
    assert_eq!(boosted.breakdown().study_quality, 15);
    assert_eq!(plain.breakdown().study_quality, 12);
}

#[test]
fn study_quality_stacks_adjustments_and_caps() {
    let capped = Article {
        abstract_text: Some(
            "A meta-analysis with n = 15,000 participants; power analysis confirmed adequacy."
                .to_string(),
        ),
        journal: Some("Psychological Science".to_string()),
        ..Article::default()
    };
    let result = evaluator().evaluate_on(&capped, today());
    assert_eq!(result.breakdown().study_quality, 40);

    let cohort = Article {
        abstract_text: Some(
            "This cohort study followed 1,500 participants; statistical power was adequate."
                .to_string(),
        ),
        ..Article::default()
    };
    let result = evaluator().evaluate_on(&cohort, today());
    assert_eq!(result.study_type(), StudyType::CohortStudy);
    assert_eq!(result.sample_size(), Some(1500));
    assert_eq!(result.breakdown().study_quality, 20 + 3 + 2);
}

#[test]
fn sample_size_bonus_uses_highest_tier_only() {
    let cases = [(150, 13), (2_000, 15), (20_000, 17), (50, 12)];
    for (size, expected) in cases {
        let article = with_abstract(&format!("We surveyed {size} participants."));
        let result = evaluator().evaluate_on(&article, today());
        assert_eq!(result.breakdown().study_quality, expected, "size {size}");
    }
}

#[test]
fn breakdown_total_matches_sum() {
    let article = with_types(
        "Quick breathing exercise for exam stress",
        "In this randomized controlled trial (n = 420), Cohen's d = 0.55. No side effects.",
        &["Randomized Controlled Trial"],
    );
    let result = evaluator().evaluate_on(&article, today());
    let sum: u16 = ScoreDimension::ALL
        .iter()
        .map(|dimension| u16::from(result.breakdown().get(*dimension)))
        .sum();
    assert_eq!(result.total_score(), sum);
    assert_eq!(result.breakdown().total(), sum);
}
