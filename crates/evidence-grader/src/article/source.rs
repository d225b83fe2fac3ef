use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{normalize_date, sanitize_text, Article};

/// Keys an exported article record may carry.
const ARTICLE_FIELDS: [&str; 8] = [
    "title",
    "abstract",
    "summary",
    "journal",
    "published_date",
    "source",
    "url",
    "publication_types",
];

/// Kind of upstream system an article batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    LiteratureDatabase,
    Feed,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::LiteratureDatabase => "literature database",
            SourceKind::Feed => "feed",
        }
    }
}

/// Capability implemented by every collector feeding the grader.
pub trait ArticleSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    fn collect(&self, limit: usize) -> Result<Vec<Article>, SourceError>;
}

/// Error raised while loading article records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read article export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid article export: {0}")]
    Format(#[from] serde_json::Error),
}

/// Articles that survived cleaning, plus how many were dropped as incomplete.
struct ExportBatch {
    articles: Vec<Article>,
    incomplete: usize,
}

/// Reads collector exports: `{"articles": [...]}` as written by the pipeline,
/// a bare JSON array, or a single article object.
pub struct JsonFileSource {
    path: PathBuf,
    kind: SourceKind,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P, kind: SourceKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// Parses an export, cleaning feed markup and date formats on the way in.
    /// Records without a title, url or publication date are dropped.
    pub fn from_reader<R: Read>(reader: R, kind: SourceKind) -> Result<Vec<Article>, SourceError> {
        read_export(reader, kind).map(|batch| batch.articles)
    }
}

impl ArticleSource for JsonFileSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn collect(&self, limit: usize) -> Result<Vec<Article>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let ExportBatch {
            mut articles,
            incomplete,
        } = read_export(BufReader::new(file), self.kind)?;
        let complete = articles.len();
        articles.truncate(limit);

        debug!(
            path = %self.path.display(),
            kind = self.kind.label(),
            complete,
            incomplete,
            kept = articles.len(),
            "loaded article export"
        );
        Ok(articles)
    }
}

fn read_export<R: Read>(reader: R, kind: SourceKind) -> Result<ExportBatch, SourceError> {
    let value: Value = serde_json::from_reader(reader)?;
    let records: Vec<Article> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        Value::Object(mut object) => match object.remove("articles") {
            Some(batch) => serde_json::from_value(batch)?,
            None => vec![single_record(object)?],
        },
        other => {
            return Err(SourceError::Format(serde_json::Error::custom(format!(
                "expected an article list or object, found {other}"
            ))))
        }
    };

    let mut articles = Vec::new();
    let mut incomplete = 0;
    for article in records.into_iter().map(|article| clean_record(article, kind)) {
        let missing = article.missing_fields();
        if missing.is_empty() {
            articles.push(article);
        } else {
            warn!(
                title = article.title(),
                missing = %missing.join(", "),
                "dropping incomplete article record"
            );
            incomplete += 1;
        }
    }

    Ok(ExportBatch {
        articles,
        incomplete,
    })
}

fn single_record(object: Map<String, Value>) -> Result<Article, SourceError> {
    if !object
        .keys()
        .any(|key| ARTICLE_FIELDS.contains(&key.as_str()))
    {
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        return Err(SourceError::Format(serde_json::Error::custom(format!(
            "object has no article fields (keys: {})",
            keys.join(", ")
        ))));
    }
    Ok(serde_json::from_value(Value::Object(object))?)
}

fn clean_record(mut article: Article, kind: SourceKind) -> Article {
    if kind == SourceKind::Feed {
        article.title = article.title.as_deref().map(sanitize_text);
        article.summary = article.summary.as_deref().map(sanitize_text);
    }

    if let Some(raw) = article.published_date.take() {
        article.published_date = match normalize_date(&raw) {
            Some(date) => Some(date),
            None => {
                warn!(date = %raw, "unrecognized publication date; keeping raw value");
                Some(raw)
            }
        };
    }

    if article.source.is_none() {
        article.source = Some(
            match kind {
                SourceKind::LiteratureDatabase => "pubmed",
                SourceKind::Feed => "rss",
            }
            .to_string(),
        );
    }

    article
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn feed_records_are_cleaned() {
        let export = r#"[{
            "title": "<b>Walking</b> and mood",
            "summary": "<p>A   brisk walk</p>",
            "url": "https://example.org/walking",
            "published_date": "Tue, 14 Jan 2025 09:30:00 +0000"
        }]"#;

        let articles =
            JsonFileSource::from_reader(export.as_bytes(), SourceKind::Feed).expect("export parses");

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Walking and mood");
        assert_eq!(articles[0].summary(), "A brisk walk");
        assert_eq!(articles[0].published_date(), Some("2025-01-14"));
        assert_eq!(articles[0].source.as_deref(), Some("rss"));
    }

    #[test]
    fn accepts_single_object_export() {
        let export = r#"{
            "title": "Single",
            "source": "pubmed",
            "url": "https://example.org/single",
            "published_date": "2025-02-01"
        }"#;
        let articles = JsonFileSource::from_reader(export.as_bytes(), SourceKind::LiteratureDatabase)
            .expect("object parses");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Single");
        assert_eq!(articles[0].source.as_deref(), Some("pubmed"));
    }

    #[test]
    fn accepts_wrapped_pipeline_export() {
        let export = r#"{"articles": [
            {
                "title": "A",
                "abstract": "A meta-analysis with n = 500.",
                "url": "https://example.org/a",
                "published_date": "2025-03-01"
            },
            {
                "title": "B",
                "url": "https://example.org/b",
                "published_date": "2025 Mar 02"
            }
        ]}"#;
        let articles = JsonFileSource::from_reader(export.as_bytes(), SourceKind::LiteratureDatabase)
            .expect("wrapped export parses");

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title(), "A");
        assert_eq!(articles[0].abstract_text(), "A meta-analysis with n = 500.");
        assert_eq!(articles[1].title(), "B");
        assert_eq!(articles[1].published_date(), Some("2025-03-02"));
    }

    #[test]
    fn rejects_object_without_article_fields() {
        let result = JsonFileSource::from_reader(
            r#"{"items": [{"title": "A"}]}"#.as_bytes(),
            SourceKind::Feed,
        );
        match result {
            Err(SourceError::Format(err)) => assert!(err.to_string().contains("items")),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_scalar_export() {
        let result = JsonFileSource::from_reader("42".as_bytes(), SourceKind::Feed);
        assert!(matches!(result, Err(SourceError::Format(_))));
    }

    #[test]
    fn incomplete_records_are_dropped() {
        let export = r#"[
            {"title": "No link", "published_date": "2025-01-01"},
            {"title": "Kept", "url": "https://example.org/kept", "published_date": "2025-01-02"},
            {"url": "https://example.org/untitled", "published_date": "2025-01-03"},
            {"title": "Undated", "url": "https://example.org/undated"}
        ]"#;
        let batch =
            read_export(export.as_bytes(), SourceKind::LiteratureDatabase).expect("export parses");

        assert_eq!(batch.incomplete, 3);
        assert_eq!(batch.articles.len(), 1);
        assert_eq!(batch.articles[0].title(), "Kept");
    }

    #[test]
    fn collect_reads_file_and_applies_limit() {
        let path = std::env::temp_dir().join(format!(
            "evidence-grader-export-{}.json",
            std::process::id()
        ));
        let mut file = File::create(&path).expect("temp file");
        file.write_all(
            br#"{"articles": [
                {"title": "One", "url": "https://example.org/1", "published_date": "2025-01-01"},
                {"title": "Two", "url": "https://example.org/2", "published_date": "2025-01-02"},
                {"title": "Broken", "published_date": "2025-01-03"}
            ]}"#,
        )
        .expect("export written");

        let source = JsonFileSource::new(&path, SourceKind::LiteratureDatabase);
        let articles = source.collect(1).expect("export loads");
        std::fs::remove_file(&path).ok();

        assert_eq!(source.kind(), SourceKind::LiteratureDatabase);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "One");
    }

    #[test]
    fn missing_file_reports_path() {
        let source = JsonFileSource::new("/nonexistent/articles.json", SourceKind::Feed);
        match source.collect(10) {
            Err(SourceError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/articles.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_export_is_a_format_error() {
        let result = JsonFileSource::from_reader("[{".as_bytes(), SourceKind::Feed);
        assert!(matches!(result, Err(SourceError::Format(_))));
    }
}
