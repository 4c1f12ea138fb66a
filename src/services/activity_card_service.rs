use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ParticipationError;
use crate::models::{ActivityRecord, ViewerId};
use crate::services::activity_status_service::strategy_for;
use crate::services::participation_service::StatusLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    Join,
    Leave,
    View,
}

impl CardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CardAction::Join => "join",
            CardAction::Leave => "leave",
            CardAction::View => "view",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCardView {
    pub activity_id: String,
    pub title: String,
    pub status_label: StatusLabel,
    pub primary_action: CardAction,
    pub participants_count: Option<u32>,
    pub max_participants: Option<u32>,
    pub is_full: bool,
    pub capacity_pct: u32,
    pub strategy: &'static str,
}

pub fn build_activity_card_view(
    record: &ActivityRecord,
    viewer: &ViewerId,
    now: DateTime<Utc>,
) -> Result<ActivityCardView, ParticipationError> {
    let strategy = strategy_for(record);
    debug!(activity_id = %record.id, strategy = strategy.name(), "activity_card_strategy");

    let info = strategy.evaluate(record, viewer, now)?;

    let primary_action = if info.can_join {
        CardAction::Join
    } else if info.can_leave {
        CardAction::Leave
    } else {
        CardAction::View
    };

    let title = record
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("未命名活动")
        .to_string();

    let (is_full, capacity_pct) = match (record.current_participants, record.max_participants) {
        (Some(current), Some(max)) => (current >= max, compute_capacity_pct(current, max)),
        _ => (false, 0),
    };

    Ok(ActivityCardView {
        activity_id: record.id.clone(),
        title,
        status_label: info.status_text,
        primary_action,
        participants_count: record.current_participants,
        max_participants: record.max_participants,
        is_full,
        capacity_pct,
        strategy: strategy.name(),
    })
}

/// One result per record, in input order.
pub fn build_activity_cards(
    records: &[ActivityRecord],
    viewer: &ViewerId,
    now: DateTime<Utc>,
) -> Vec<Result<ActivityCardView, ParticipationError>> {
    records
        .iter()
        .map(|record| build_activity_card_view(record, viewer, now))
        .collect()
}

fn compute_capacity_pct(current: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let pct = (u64::from(current) * 100) / u64::from(max);
    pct.min(100) as u32
}
