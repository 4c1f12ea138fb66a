use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParticipationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Draft => "draft",
            ActivityStatus::Published => "published",
            ActivityStatus::Cancelled => "cancelled",
            ActivityStatus::Completed => "completed",
        }
    }

    /// Strict: the set is closed, so anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ActivityStatus::Draft),
            "published" => Some(ActivityStatus::Published),
            "cancelled" => Some(ActivityStatus::Cancelled),
            "completed" => Some(ActivityStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Typed activity snapshot the participation rules evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub status: ActivityStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub current_participants: u32,
    pub max_participants: u32,
    pub organizer: OrganizerRef,
    /// Viewer-relative: callers refresh it per viewer.
    pub is_joined: bool,
}

/// Activity as handed over by the data layer. Every field is optional so
/// partial, list-style records decode too; see [`ActivityRecord::carries_timing_and_organizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "start_time", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, alias = "end_time", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(
        default,
        alias = "registration_deadline",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_deadline: Option<String>,
    #[serde(
        default,
        alias = "current_participants",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_participants: Option<u32>,
    #[serde(
        default,
        alias = "max_participants",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<OrganizerRef>,
    #[serde(default, alias = "is_joined")]
    pub is_joined: bool,
}

impl ActivityRecord {
    /// Whether the record has what the full rule set needs: both timestamps
    /// and an organizer.
    pub fn carries_timing_and_organizer(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some() && self.organizer.is_some()
    }
}

impl TryFrom<&ActivityRecord> for Activity {
    type Error = ParticipationError;

    fn try_from(record: &ActivityRecord) -> Result<Self, Self::Error> {
        let status_raw = require(record, "status", record.status.as_deref())?;
        let status = ActivityStatus::parse(status_raw.trim()).ok_or_else(|| {
            ParticipationError::UnknownStatus {
                activity_id: record.id.clone(),
                status: status_raw.to_string(),
            }
        })?;

        let start_time = decode_timestamp(
            record,
            "startTime",
            require(record, "startTime", record.start_time.as_deref())?,
        )?;
        let end_time = decode_timestamp(
            record,
            "endTime",
            require(record, "endTime", record.end_time.as_deref())?,
        )?;
        let registration_deadline = record
            .registration_deadline
            .as_deref()
            .map(|raw| decode_timestamp(record, "registrationDeadline", raw))
            .transpose()?;

        let current_participants = require(
            record,
            "currentParticipants",
            record.current_participants,
        )?;
        let max_participants = require(record, "maxParticipants", record.max_participants)?;
        let organizer = require(record, "organizer", record.organizer.clone())?;

        Ok(Activity {
            id: record.id.clone(),
            status,
            start_time,
            end_time,
            registration_deadline,
            current_participants,
            max_participants,
            organizer,
            is_joined: record.is_joined,
        })
    }
}

fn require<T>(
    record: &ActivityRecord,
    field: &'static str,
    value: Option<T>,
) -> Result<T, ParticipationError> {
    value.ok_or_else(|| ParticipationError::MissingField {
        activity_id: record.id.clone(),
        field,
    })
}

fn decode_timestamp(
    record: &ActivityRecord,
    field: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, ParticipationError> {
    parse_timestamp(raw).map_err(|source| ParticipationError::InvalidTimestamp {
        activity_id: record.id.clone(),
        field,
        value: raw.to_string(),
        source,
    })
}

// Naive inputs like 2025-10-17T10:06:13.256414 carry no offset and are read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 instant. On failure the RFC 3339 error is returned.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    let rfc_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(rfc_err)
}

/// Decodes a JSON array of activity records one element at a time, so a
/// malformed element only fails itself. The outer `Err` is for input that is
/// not a JSON array at all.
pub fn decode_activity_records(
    raw: &str,
) -> serde_json::Result<Vec<serde_json::Result<ActivityRecord>>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    Ok(values.into_iter().map(serde_json::from_value).collect())
}
