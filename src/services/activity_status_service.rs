//! Picks the rule set for an activity record.
//!
//! Full records (timestamps and organizer present) go through the
//! participation rules. List-style records that only carry a coarse status
//! string go through a lower-fidelity lookup that produces the same labels.
//! The two paths stay separate; a record is evaluated by exactly one.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::ParticipationError;
use crate::models::{Activity, ActivityRecord, ViewerId};
use crate::services::participation_service::{self, ParticipationInfo, StatusLabel};

pub trait StatusStrategy {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        record: &ActivityRecord,
        viewer: &ViewerId,
        now: DateTime<Utc>,
    ) -> Result<ParticipationInfo, ParticipationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FullRecordStrategy;

impl StatusStrategy for FullRecordStrategy {
    fn name(&self) -> &'static str {
        "full"
    }

    fn evaluate(
        &self,
        record: &ActivityRecord,
        viewer: &ViewerId,
        now: DateTime<Utc>,
    ) -> Result<ParticipationInfo, ParticipationError> {
        let activity = Activity::try_from(record)?;
        if let Some(veto) = participation_service::join_veto(&activity, viewer, now) {
            debug!(activity_id = %activity.id, veto = ?veto, "activity_join_blocked");
        }
        Ok(participation_service::participation_info(
            &activity, viewer, now,
        ))
    }
}

/// Coarse status vocabulary of partial records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseStatus {
    Registered,
    Organized,
    Ongoing,
    Ended,
    Completed,
    Cancelled,
    Draft,
    Default,
}

impl CoarseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CoarseStatus::Registered => "registered",
            CoarseStatus::Organized => "organized",
            CoarseStatus::Ongoing => "ongoing",
            CoarseStatus::Ended => "ended",
            CoarseStatus::Completed => "completed",
            CoarseStatus::Cancelled => "cancelled",
            CoarseStatus::Draft => "draft",
            CoarseStatus::Default => "default",
        }
    }
}

pub fn parse_coarse_status(input: Option<&str>) -> CoarseStatus {
    match input.map(str::trim).unwrap_or("default") {
        "registered" => CoarseStatus::Registered,
        "organized" => CoarseStatus::Organized,
        "ongoing" => CoarseStatus::Ongoing,
        "ended" => CoarseStatus::Ended,
        "completed" => CoarseStatus::Completed,
        "cancelled" => CoarseStatus::Cancelled,
        "draft" => CoarseStatus::Draft,
        _ => CoarseStatus::Default,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackStrategy;

impl FallbackStrategy {
    /// `is_joined` is the record's own flag and is reported unchanged.
    pub fn info_for(status: CoarseStatus, is_joined: bool) -> ParticipationInfo {
        let ended = matches!(
            status,
            CoarseStatus::Ended | CoarseStatus::Completed | CoarseStatus::Cancelled
        );
        let is_organizer = status == CoarseStatus::Organized;
        let registered = is_joined || status == CoarseStatus::Registered;

        let status_text = if ended {
            StatusLabel::Ended
        } else if is_organizer {
            StatusLabel::Organized
        } else if registered {
            StatusLabel::Joined
        } else {
            StatusLabel::Open
        };

        ParticipationInfo {
            ended,
            is_organizer,
            can_join: status_text == StatusLabel::Open && status != CoarseStatus::Draft,
            can_leave: status_text == StatusLabel::Joined,
            status_text,
            is_joined,
        }
    }
}

impl StatusStrategy for FallbackStrategy {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn evaluate(
        &self,
        record: &ActivityRecord,
        _viewer: &ViewerId,
        _now: DateTime<Utc>,
    ) -> Result<ParticipationInfo, ParticipationError> {
        Ok(Self::info_for(
            parse_coarse_status(record.status.as_deref()),
            record.is_joined,
        ))
    }
}

static FULL_RECORD: FullRecordStrategy = FullRecordStrategy;
static FALLBACK: FallbackStrategy = FallbackStrategy;

pub fn strategy_for(record: &ActivityRecord) -> &'static dyn StatusStrategy {
    if record.carries_timing_and_organizer() {
        &FULL_RECORD
    } else {
        &FALLBACK
    }
}

pub fn evaluate_record(
    record: &ActivityRecord,
    viewer: &ViewerId,
    now: DateTime<Utc>,
) -> Result<ParticipationInfo, ParticipationError> {
    strategy_for(record).evaluate(record, viewer, now)
}
