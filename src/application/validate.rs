//! Schema validation for movie payloads.
//!
//! Both entry points are pure: they inspect a JSON payload, drop unrecognized
//! fields, and either return a normalized value or enumerate every violated
//! field with a human-readable reason. Nothing here touches the store.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use url::Url;

use crate::domain::movies::is_permitted_genre;

/// Lower bound for `year`: the earliest surviving film.
pub const FIRST_FILM_YEAR: i32 = 1888;

/// Upper bound for `year`: next year's releases are fair game.
fn max_year() -> i32 {
    OffsetDateTime::now_utc().year() + 1
}

/// A single violated field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// Validation failure enumerating every violated field, not just the first.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {}", self.summary())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Whether any issue concerns the named field.
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

/// A fully validated movie, minus the id the store will assign.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<String>,
    pub rate: f64,
}

/// A validated partial update; `None` fields were absent and stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
    pub genre: Option<Vec<String>>,
    pub rate: Option<f64>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.director.is_none()
            && self.duration.is_none()
            && self.poster.is_none()
            && self.genre.is_none()
            && self.rate.is_none()
    }
}

#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

/// Validate a full creation payload. Every field except `rate` is required;
/// `rate` defaults to 0.
pub fn validate_movie(payload: &Value) -> Result<MovieDraft, ValidationError> {
    let mut issues = Issues::default();
    let Some(object) = payload.as_object() else {
        issues.push("payload", "expected a JSON object");
        return issues.into_result(unreachable_draft());
    };

    let title = required_text(object.get("title"), "title", &mut issues);
    let director = required_text(object.get("director"), "director", &mut issues);

    let year = match object.get("year") {
        Some(value) => check_year(value, &mut issues),
        None => {
            issues.push("year", "is required");
            None
        }
    };
    let duration = match object.get("duration") {
        Some(value) => check_duration(value, &mut issues),
        None => {
            issues.push("duration", "is required");
            None
        }
    };
    let poster = match object.get("poster") {
        Some(value) => check_poster(value, &mut issues),
        None => {
            issues.push("poster", "is required");
            None
        }
    };
    let genre = match object.get("genre") {
        Some(value) => check_genre(value, &mut issues),
        None => {
            issues.push("genre", "is required");
            None
        }
    };
    let rate = match object.get("rate") {
        Some(value) => check_rate(value, &mut issues),
        None => Some(0.0),
    };

    if let (Some(title), Some(year), Some(director), Some(duration), Some(poster), Some(genre), Some(rate)) =
        (title, year, director, duration, poster, genre, rate)
    {
        issues.into_result(MovieDraft {
            title,
            year,
            director,
            duration,
            poster,
            genre,
            rate,
        })
    } else {
        issues.into_result(unreachable_draft())
    }
}

/// Validate a partial update payload. At least one recognized field must be
/// present; each present field obeys the full-mode rules.
pub fn validate_partial_movie(payload: &Value) -> Result<MoviePatch, ValidationError> {
    let mut issues = Issues::default();
    let Some(object) = payload.as_object() else {
        issues.push("payload", "expected a JSON object");
        return issues.into_result(MoviePatch::default());
    };

    let patch = MoviePatch {
        title: object
            .get("title")
            .and_then(|value| required_text(Some(value), "title", &mut issues)),
        year: object.get("year").and_then(|value| check_year(value, &mut issues)),
        director: object
            .get("director")
            .and_then(|value| required_text(Some(value), "director", &mut issues)),
        duration: object
            .get("duration")
            .and_then(|value| check_duration(value, &mut issues)),
        poster: object
            .get("poster")
            .and_then(|value| check_poster(value, &mut issues)),
        genre: object
            .get("genre")
            .and_then(|value| check_genre(value, &mut issues)),
        rate: object.get("rate").and_then(|value| check_rate(value, &mut issues)),
    };

    let recognized = ["title", "year", "director", "duration", "poster", "genre", "rate"]
        .iter()
        .any(|field| object.contains_key(*field));
    if !recognized {
        issues.push("payload", "at least one movie field must be provided");
    }

    issues.into_result(patch)
}

// Placeholder returned on the error path only; into_result discards it.
fn unreachable_draft() -> MovieDraft {
    MovieDraft {
        title: String::new(),
        year: 0,
        director: String::new(),
        duration: 0,
        poster: String::new(),
        genre: Vec::new(),
        rate: 0.0,
    }
}

fn required_text(
    value: Option<&Value>,
    field: &'static str,
    issues: &mut Issues,
) -> Option<String> {
    match value {
        None => {
            issues.push(field, "is required");
            None
        }
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        Some(Value::String(_)) => {
            issues.push(field, "must not be empty");
            None
        }
        Some(_) => {
            issues.push(field, "must be a string");
            None
        }
    }
}

fn check_year(value: &Value, issues: &mut Issues) -> Option<i32> {
    let Some(year) = value.as_i64().and_then(|y| i32::try_from(y).ok()) else {
        issues.push("year", "must be an integer");
        return None;
    };
    let upper = max_year();
    if (FIRST_FILM_YEAR..=upper).contains(&year) {
        Some(year)
    } else {
        issues.push(
            "year",
            format!("must be between {FIRST_FILM_YEAR} and {upper}"),
        );
        None
    }
}

fn check_duration(value: &Value, issues: &mut Issues) -> Option<u32> {
    match value.as_u64().and_then(|d| u32::try_from(d).ok()) {
        Some(duration) if duration > 0 => Some(duration),
        Some(_) => {
            issues.push("duration", "must be a positive number of minutes");
            None
        }
        None => {
            issues.push("duration", "must be a positive integer");
            None
        }
    }
}

fn check_rate(value: &Value, issues: &mut Issues) -> Option<f64> {
    match value.as_f64() {
        Some(rate) if (0.0..=10.0).contains(&rate) => Some(rate),
        Some(_) => {
            issues.push("rate", "must be between 0 and 10");
            None
        }
        None => {
            issues.push("rate", "must be a number");
            None
        }
    }
}

fn check_poster(value: &Value, issues: &mut Issues) -> Option<String> {
    let Some(text) = value.as_str() else {
        issues.push("poster", "must be a string");
        return None;
    };
    match Url::parse(text) {
        Ok(_) => Some(text.to_string()),
        Err(_) => {
            issues.push("poster", "must be a valid URL");
            None
        }
    }
}

fn check_genre(value: &Value, issues: &mut Issues) -> Option<Vec<String>> {
    let Some(entries) = value.as_array() else {
        issues.push("genre", "must be an array of genre tags");
        return None;
    };
    if entries.is_empty() {
        issues.push("genre", "must contain at least one genre tag");
        return None;
    }

    let mut tags = Vec::with_capacity(entries.len());
    let mut valid = true;
    for entry in entries {
        match entry.as_str() {
            Some(tag) if is_permitted_genre(tag) => tags.push(tag.to_string()),
            Some(tag) => {
                issues.push("genre", format!("`{tag}` is not a permitted genre tag"));
                valid = false;
            }
            None => {
                issues.push("genre", "tags must be strings");
                valid = false;
            }
        }
    }

    valid.then_some(tags)
}
