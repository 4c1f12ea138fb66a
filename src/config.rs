use chrono::{DateTime, Utc};
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::activities::parse_timestamp;
use crate::models::ViewerId;

/// Settings for the participation report, read from the environment.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub activities_path: PathBuf,
    pub viewer_id: ViewerId,
    /// Overrides the system clock when set.
    pub now: Option<DateTime<Utc>>,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let activities_path = required(&lookup, "ACTIVITIES_PATH")?;
        // Used verbatim: organizer matching is exact.
        let viewer_id = lookup("VIEWER_ID")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar("VIEWER_ID"))?;

        let now = match non_empty(&lookup, "REPORT_NOW") {
            Some(raw) => Some(parse_timestamp(&raw).map_err(|e| ConfigError::InvalidVar {
                name: "REPORT_NOW",
                value: raw.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(ReportConfig {
            activities_path: PathBuf::from(activities_path),
            viewer_id: ViewerId::new(viewer_id),
            now,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &'static str) -> Option<String>
where
    F: Fn(&'static str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    non_empty(lookup, name).ok_or(ConfigError::MissingVar(name))
}
