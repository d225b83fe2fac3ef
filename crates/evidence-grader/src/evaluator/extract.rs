//! Pattern-driven extraction of quantitative study metrics.
//!
//! Each extractor walks an ordered list of patterns and takes the first
//! candidate that parses and passes its range checks. A malformed number
//! only disqualifies that candidate.

use std::borrow::Cow;
use std::f64::consts::PI;
use std::sync::LazyLock;

use regex::Regex;

/// Smallest sample size accepted as a real study population.
pub const MIN_SAMPLE_SIZE: u32 = 10;
/// Largest sample size accepted before a number is treated as noise.
pub const MAX_SAMPLE_SIZE: u32 = 10_000_000;

/// Correlations at or beyond this magnitude are not converted to d.
const MAX_CONVERTIBLE_CORRELATION: f64 = 0.99;

static SAMPLE_SIZE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)n\s*=\s*(\d+[,\d]*)",
        r"(?i)(\d+[,\d]*)\s*participants?",
        r"(?i)(\d+[,\d]*)\s*subjects?",
        r"(?i)sample size.*?(\d+[,\d]*)",
        r"(?i)total of\s*(\d+[,\d]*)",
        r"(?i)study included\s*(\d+[,\d]*)",
        r"(?i)recruited\s*(\d+[,\d]*)",
    ])
});

static STANDARDIZED_DIFFERENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(?:cohen'?s?\s*d|hedge'?s?\s*g)\s*=\s*(-?\d+\.?\d*)",
        r"(?i)effect size.*?d\s*=\s*(-?\d+\.?\d*)",
        r"(?i)\bd\s*=\s*(-?\d+\.?\d*)",
    ])
});

// Case-sensitive: "R =" in prose is rarely a correlation.
static CORRELATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"r\s*=\s*(-?\d+\.?\d*)").expect("correlation pattern compiles"));

static ODDS_RATIO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)odds ratio.*?([\d.]+)").expect("odds ratio pattern compiles")
});

static P_VALUE_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"(?i)p\s*[<>=]\s*([\d.]+)", r"(?i)p\s*=\s*([\d.]+)"]));

static CONFIDENCE_INTERVAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)%?\s*(?:confidence interval|ci).*?([\d.-]+).*?([\d.-]+)")
        .expect("confidence interval pattern compiles")
});

static DURATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(\d+)\s*(?:week|month|year)s?\s*(?:study|trial|follow)",
        r"(?i)over\s*(\d+)\s*(?:week|month|year)s?",
        r"(?i)during\s*(\d+)\s*(?:week|month|year)s?",
    ])
});

static FOLLOW_UP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)follow-?up.*?(\d+)\s*(?:week|month|year)s?",
        r"(?i)(\d+)\s*(?:week|month|year)s?\s*follow-?up",
    ])
});

// Same class the extraction patterns use for `\d`.
static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("decimal digit pattern compiles"));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("extraction pattern compiles"))
        .collect()
}

/// Everything the extractor pulls out of an article body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedMetrics {
    pub sample_size: Option<u32>,
    pub effect_size: Option<f64>,
    pub p_value: Option<f64>,
    pub confidence_interval: Option<[f64; 2]>,
    pub study_duration: Option<String>,
    pub follow_up_period: Option<String>,
}

impl ExtractedMetrics {
    pub fn from_text(text: &str) -> Self {
        Self {
            sample_size: sample_size(text),
            effect_size: effect_size(text),
            p_value: p_value(text),
            confidence_interval: confidence_interval(text),
            study_duration: study_duration(text),
            follow_up_period: follow_up_period(text),
        }
    }
}

pub fn sample_size(text: &str) -> Option<u32> {
    SAMPLE_SIZE_PATTERNS.iter().find_map(|pattern| {
        let digits = ascii_digits(first_capture(pattern, text)?).replace(',', "");
        let size = digits.parse::<u64>().ok()?;
        if (u64::from(MIN_SAMPLE_SIZE)..=u64::from(MAX_SAMPLE_SIZE)).contains(&size) {
            u32::try_from(size).ok()
        } else {
            None
        }
    })
}

/// Effect size in Cohen's d units. Reported d/g wins, then a correlation,
/// then an odds ratio; only the first category that yields a value is used.
pub fn effect_size(text: &str) -> Option<f64> {
    standardized_difference(text)
        .or_else(|| correlation_as_d(text))
        .or_else(|| odds_ratio_as_d(text))
}

fn standardized_difference(text: &str) -> Option<f64> {
    STANDARDIZED_DIFFERENCE_PATTERNS
        .iter()
        .find_map(|pattern| first_capture(pattern, text).and_then(parse_finite))
}

fn correlation_as_d(text: &str) -> Option<f64> {
    let r = first_capture(&CORRELATION_PATTERN, text).and_then(parse_finite)?;
    if !(-1.0..=1.0).contains(&r) || r.abs() >= MAX_CONVERTIBLE_CORRELATION {
        return None;
    }
    Some(correlation_to_d(r))
}

fn odds_ratio_as_d(text: &str) -> Option<f64> {
    let odds_ratio = first_capture(&ODDS_RATIO_PATTERN, text).and_then(parse_finite)?;
    if odds_ratio <= 0.0 {
        return None;
    }
    Some(odds_ratio_to_d(odds_ratio))
}

/// d = 2r / sqrt(1 - r^2)
pub fn correlation_to_d(r: f64) -> f64 {
    2.0 * r / (1.0 - r * r).sqrt()
}

/// Logit approximation: d = ln(OR) * sqrt(3) / pi
pub fn odds_ratio_to_d(odds_ratio: f64) -> f64 {
    odds_ratio.ln() * 3f64.sqrt() / PI
}

pub fn p_value(text: &str) -> Option<f64> {
    P_VALUE_PATTERNS
        .iter()
        .find_map(|pattern| first_capture(pattern, text).and_then(parse_finite))
}

pub fn confidence_interval(text: &str) -> Option<[f64; 2]> {
    let captures = CONFIDENCE_INTERVAL_PATTERN.captures(text)?;
    let lower = captures.get(2).and_then(|m| parse_finite(m.as_str()))?;
    let upper = captures.get(3).and_then(|m| parse_finite(m.as_str()))?;
    Some([lower, upper])
}

pub fn study_duration(text: &str) -> Option<String> {
    first_span(&DURATION_PATTERNS, text)
}

pub fn follow_up_period(text: &str) -> Option<String> {
    first_span(&FOLLOW_UP_PATTERNS, text)
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn first_span(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
}

fn parse_finite(raw: &str) -> Option<f64> {
    ascii_digits(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Rewrites any Unicode decimal digits (Arabic-Indic, fullwidth, ...) as ASCII
/// so captured numbers parse the same whatever script they were written in.
fn ascii_digits(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.chars()
            .map(|c| {
                digit_value(c)
                    .and_then(|value| char::from_digit(value, 10))
                    .unwrap_or(c)
            })
            .collect(),
    )
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Decimal digits are encoded in contiguous runs of ten starting at zero, so
/// a digit's value is its offset from the start of its run of digits.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = u32::from(c);
    while let Some(previous) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(previous) {
            break;
        }
        start -= 1;
    }
    Some((u32::from(c) - start) % 10)
}
