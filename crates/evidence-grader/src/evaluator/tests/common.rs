use chrono::NaiveDate;

use crate::article::Article;
use crate::evaluator::QualityEvaluator;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> String {
    (today() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub(super) fn evaluator() -> QualityEvaluator {
    QualityEvaluator::default()
}

pub(super) fn with_abstract(text: &str) -> Article {
    Article {
        abstract_text: Some(text.to_string()),
        ..Article::default()
    }
}

pub(super) fn with_types(title: &str, abstract_text: &str, types: &[&str]) -> Article {
    Article {
        title: Some(title.to_string()),
        abstract_text: Some(abstract_text.to_string()),
        publication_types: types.iter().map(|value| value.to_string()).collect(),
        ..Article::default()
    }
}
