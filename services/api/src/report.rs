use chrono::{Local, NaiveDate};
use clap::Args;
use evidence_grader::article::{ArticleSource, JsonFileSource, SourceKind};
use evidence_grader::config::AppConfig;
use evidence_grader::error::AppError;
use evidence_grader::evaluator::{EvaluationResult, QualityEvaluator};
use evidence_grader::screening::{ScreeningPipeline, ScreeningReport};
use evidence_grader::Article;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON export: `{"articles": [...]}`, an array, or a single article
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date used for recency scoring (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Treat the export as feed items (strips markup from titles and summaries)
    #[arg(long)]
    pub(crate) feed: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// JSON export: `{"articles": [...]}` or an array of articles
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Minimum total score to pass (defaults to SCREENING_THRESHOLD)
    #[arg(long, value_parser = crate::infra::parse_threshold)]
    pub(crate) threshold: Option<u16>,
    /// Number of top articles to list (defaults to SCREENING_SUMMARY_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Evaluation date used for recency scoring (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the full screening report as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Treat the export as feed items (strips markup from titles and summaries)
    #[arg(long)]
    pub(crate) feed: bool,
}

fn source_kind(feed: bool) -> SourceKind {
    if feed {
        SourceKind::Feed
    } else {
        SourceKind::LiteratureDatabase
    }
}

fn load_articles(input: PathBuf, feed: bool) -> Result<Vec<Article>, AppError> {
    let source = JsonFileSource::new(input, source_kind(feed));
    Ok(source.collect(usize::MAX)?)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs { input, today, feed } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let articles = load_articles(input, feed)?;
    let evaluator = QualityEvaluator::new(config.evaluator);

    for article in &articles {
        let result = evaluator.evaluate_on(article, today);
        println!("{}", render_evaluation(article, &result));
    }

    Ok(())
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let ScreenArgs {
        input,
        threshold,
        limit,
        today,
        json,
        feed,
    } = args;

    let config = AppConfig::load()?;
    let mut pipeline = ScreeningPipeline::new(
        Arc::new(QualityEvaluator::new(config.evaluator.clone())),
        config.screening,
    );
    if let Some(threshold) = threshold {
        pipeline = pipeline.with_threshold(threshold);
    }

    let articles = load_articles(input, feed)?;
    let report = pipeline.screen(articles, today);

    if json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
        println!("{body}");
    } else {
        let limit = limit.unwrap_or(config.screening.summary_limit);
        println!("{}", render_screening(&report, limit));
    }

    Ok(())
}

pub(crate) fn render_evaluation(article: &Article, result: &EvaluationResult) -> String {
    let mut out = String::new();
    let title = if article.title().is_empty() {
        "(untitled)"
    } else {
        article.title()
    };

    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "Score {}/100 | {} evidence | {}",
        result.total_score(),
        result.evidence_level(),
        result.study_type()
    );
    let _ = writeln!(out, "{}", result.recommendation());

    for (dimension, score) in result.breakdown().entries() {
        let (_, max) = dimension.bounds();
        let _ = writeln!(out, "- {}: {score}/{max}", dimension.key());
    }

    if let Some(size) = result.sample_size() {
        let _ = writeln!(out, "Sample size: {size}");
    }
    if let Some(effect) = result.effect_size() {
        let _ = writeln!(out, "Effect size (d): {effect:.2}");
    }
    let details = result.details();
    if let Some(p) = details.p_value {
        let _ = writeln!(out, "p-value: {p}");
    }
    if let Some([lower, upper]) = details.confidence_interval {
        let _ = writeln!(out, "Confidence interval: {lower} to {upper}");
    }
    if let Some(duration) = &details.study_duration {
        let _ = writeln!(out, "Duration: {duration}");
    }
    if let Some(follow_up) = &details.follow_up_period {
        let _ = writeln!(out, "Follow-up: {follow_up}");
    }

    out
}

pub(crate) fn render_screening(report: &ScreeningReport, limit: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Screened {} articles on {} (threshold {})",
        report.received, report.evaluated_on, report.threshold
    );
    let _ = writeln!(
        out,
        "- {} passed, {} rejected, {} duplicates dropped",
        report.passed.len(),
        report.rejected,
        report.duplicates
    );

    let top = report.top(limit);
    if top.is_empty() {
        let _ = writeln!(out, "\nNo articles met the threshold.");
        return out;
    }

    let _ = writeln!(out, "\nTop {} for summarization", top.len());
    for (rank, scored) in top.iter().enumerate() {
        let evaluation = &scored.evaluation;
        let _ = writeln!(
            out,
            "{}. [{}] {} ({}, {})",
            rank + 1,
            evaluation.total_score,
            scored.article.title(),
            evaluation.evidence_level,
            evaluation.study_type
        );
    }

    out
}
