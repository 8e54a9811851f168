//! Field rules for campaign records.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::entities::CampaignRecord;
use super::types::{CampaignStatus, Platform};

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_DESCRIPTION_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every field rule a record broke, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Trim, lowercase, drop empties, dedupe and sort.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn normalize_platforms<I>(platforms: I) -> Vec<Platform>
where
    I: IntoIterator<Item = Platform>,
{
    platforms
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Check every field rule that applies to the record in its current status.
pub fn validate_campaign(record: &CampaignRecord) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if record.title.trim().chars().count() < MIN_TITLE_CHARS {
        errors.push(
            "title",
            format!("must be at least {MIN_TITLE_CHARS} characters"),
        );
    }
    if record.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        errors.push(
            "description",
            format!("must be at least {MIN_DESCRIPTION_CHARS} characters"),
        );
    }
    if !record.budget.is_finite() || record.budget <= 0.0 {
        errors.push("budget", "must be greater than zero");
    }
    if record.platforms.is_empty() {
        errors.push("platforms", "at least one platform is required");
    }
    if !record.age_range.is_ordered() {
        errors.push("age_range", "minimum age must not exceed maximum age");
    }
    if !record.schedule.is_ordered() {
        errors.push("schedule", "start date must not be after end date");
    }

    if record.status != CampaignStatus::Draft {
        push_audience_violations(record, &mut errors);
    }

    errors.into_result()
}

/// Audience rules a draft must satisfy before it can be published.
pub fn validate_publish_ready(record: &CampaignRecord) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    push_audience_violations(record, &mut errors);
    errors.into_result()
}

fn push_audience_violations(record: &CampaignRecord, errors: &mut ValidationErrors) {
    if record.interests.is_empty() {
        errors.push("interests", "at least one interest is required once published");
    }
    if record.regions.is_empty() {
        errors.push("regions", "at least one region is required once published");
    }
}
