//! Article records handed to the grader by upstream collectors.
//!
//! Every field is optional. Missing or `null` values behave as empty text so
//! that grading never fails on partial records.

mod sanitize;
mod source;

pub use sanitize::{normalize_date, sanitize_text};
pub use source::{ArticleSource, JsonFileSource, SourceError, SourceKind};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Article record as produced by a literature database or feed collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub publication_types: Vec<String>,
}

impl Article {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn abstract_text(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn journal(&self) -> &str {
        self.journal.as_deref().unwrap_or("")
    }

    pub fn published_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }

    /// Abstract and summary joined by a space. Metric extraction never looks at the title.
    pub fn body_text(&self) -> String {
        format!("{} {}", self.abstract_text(), self.summary())
    }

    /// Title, abstract and summary joined by spaces.
    pub fn full_text(&self) -> String {
        format!("{} {} {}", self.title(), self.abstract_text(), self.summary())
    }

    pub fn publication_types_text(&self) -> String {
        self.publication_types.join(" ")
    }

    /// A record is publishable only with a title, a link and a publication date.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Required fields that are absent or blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("url", &self.url),
            ("published_date", &self.published_date),
        ]
        .into_iter()
        .filter(|(_, field)| field.as_deref().map_or(true, |value| value.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    fn identity(&self) -> (String, String) {
        (
            self.title().trim().to_string(),
            self.url.as_deref().unwrap_or("").trim().to_string(),
        )
    }
}

/// Keeps the first record for each (title, url) pair, preserving input order.
pub fn deduplicate(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.identity()))
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_partial_records() {
        let article: Article = serde_json::from_value(json!({
            "title": "Sleep and memory",
            "abstract": null,
            "publication_types": null,
        }))
        .expect("partial record deserializes");

        assert_eq!(article.title(), "Sleep and memory");
        assert_eq!(article.abstract_text(), "");
        assert!(article.publication_types.is_empty());
        assert_eq!(article.body_text(), " ");
    }

    #[test]
    fn reads_abstract_field_name() {
        let article: Article = serde_json::from_value(json!({
            "abstract": "We recruited 120 adults.",
            "publication_types": ["Journal Article", "Randomized Controlled Trial"],
        }))
        .expect("record deserializes");

        assert_eq!(article.abstract_text(), "We recruited 120 adults.");
        assert_eq!(
            article.publication_types_text(),
            "Journal Article Randomized Controlled Trial"
        );
    }

    #[test]
    fn completeness_requires_title_url_and_date() {
        let mut article = Article {
            title: Some("Gratitude journaling".to_string()),
            url: Some("https://example.org/a".to_string()),
            published_date: Some("2025-02-01".to_string()),
            ..Article::default()
        };
        assert!(article.is_complete());

        article.url = Some(String::new());
        assert!(!article.is_complete());
        assert_eq!(article.missing_fields(), vec!["url"]);

        article.title = Some("   ".to_string());
        article.published_date = None;
        assert_eq!(
            article.missing_fields(),
            vec!["title", "url", "published_date"]
        );
    }

    #[test]
    fn deduplicate_keeps_first_occurrence() {
        let first = Article {
            title: Some("Same".to_string()),
            url: Some("https://example.org/same".to_string()),
            source: Some("rss".to_string()),
            ..Article::default()
        };
        let duplicate = Article {
            source: Some("pubmed".to_string()),
            ..first.clone()
        };
        let other = Article {
            title: Some("Different".to_string()),
            ..first.clone()
        };

        let unique = deduplicate(vec![first.clone(), duplicate, other.clone()]);
        assert_eq!(unique, vec![first, other]);
    }
}
