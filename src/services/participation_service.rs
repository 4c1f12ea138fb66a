//! Participation rules for a single (activity, viewer) pair.
//!
//! All functions are pure reads over an [`Activity`] snapshot and an explicit
//! evaluation instant. Nothing is cached; two calls with a different `now`
//! may disagree, two calls with the same `now` never do.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::clock::Clock;
use crate::models::{Activity, ActivityStatus, ViewerId};

/// Display label for an activity, from a closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    #[serde(rename = "活动已结束")]
    Ended,
    #[serde(rename = "已组织")]
    Organized,
    #[serde(rename = "已报名")]
    Joined,
    #[serde(rename = "已满员")]
    Full,
    #[serde(rename = "报名已截止")]
    DeadlinePassed,
    #[serde(rename = "可报名")]
    Open,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::Ended => "活动已结束",
            StatusLabel::Organized => "已组织",
            StatusLabel::Joined => "已报名",
            StatusLabel::Full => "已满员",
            StatusLabel::DeadlinePassed => "报名已截止",
            StatusLabel::Open => "可报名",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First reason the viewer may not join, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinVeto {
    Organizer,
    AlreadyJoined,
    Ended,
    NotPublished,
    Full,
    DeadlinePassed,
}

/// First reason the viewer may not leave, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveVeto {
    Organizer,
    NotJoined,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationInfo {
    pub ended: bool,
    pub is_organizer: bool,
    pub can_join: bool,
    pub can_leave: bool,
    pub status_text: StatusLabel,
    pub is_joined: bool,
}

pub fn is_ended(activity: &Activity, now: DateTime<Utc>) -> bool {
    now > activity.end_time
        || matches!(
            activity.status,
            ActivityStatus::Completed | ActivityStatus::Cancelled
        )
}

pub fn is_organizer(activity: &Activity, viewer: &ViewerId) -> bool {
    activity.organizer.id == viewer.as_str()
}

/// Does not gate joining, leaving or the label.
pub fn is_started(activity: &Activity, now: DateTime<Utc>) -> bool {
    now >= activity.start_time
}

pub fn is_full(activity: &Activity) -> bool {
    activity.current_participants >= activity.max_participants
}

/// `false` when there is no deadline.
pub fn is_deadline_passed(activity: &Activity, now: DateTime<Utc>) -> bool {
    activity
        .registration_deadline
        .is_some_and(|deadline| now > deadline)
}

pub fn join_veto(activity: &Activity, viewer: &ViewerId, now: DateTime<Utc>) -> Option<JoinVeto> {
    if is_organizer(activity, viewer) {
        return Some(JoinVeto::Organizer);
    }
    if activity.is_joined {
        return Some(JoinVeto::AlreadyJoined);
    }
    if is_ended(activity, now) {
        return Some(JoinVeto::Ended);
    }
    if activity.status != ActivityStatus::Published {
        return Some(JoinVeto::NotPublished);
    }
    if is_full(activity) {
        return Some(JoinVeto::Full);
    }
    if is_deadline_passed(activity, now) {
        return Some(JoinVeto::DeadlinePassed);
    }
    None
}

pub fn can_join(activity: &Activity, viewer: &ViewerId, now: DateTime<Utc>) -> bool {
    join_veto(activity, viewer, now).is_none()
}

pub fn leave_veto(
    activity: &Activity,
    viewer: &ViewerId,
    now: DateTime<Utc>,
) -> Option<LeaveVeto> {
    if is_organizer(activity, viewer) {
        return Some(LeaveVeto::Organizer);
    }
    if !activity.is_joined {
        return Some(LeaveVeto::NotJoined);
    }
    if is_ended(activity, now) {
        return Some(LeaveVeto::Ended);
    }
    if activity.status == ActivityStatus::Cancelled {
        return Some(LeaveVeto::Cancelled);
    }
    None
}

pub fn can_leave(activity: &Activity, viewer: &ViewerId, now: DateTime<Utc>) -> bool {
    leave_veto(activity, viewer, now).is_none()
}

pub fn status_text(activity: &Activity, viewer: &ViewerId, now: DateTime<Utc>) -> StatusLabel {
    if is_ended(activity, now) {
        StatusLabel::Ended
    } else if is_organizer(activity, viewer) {
        StatusLabel::Organized
    } else if activity.is_joined {
        StatusLabel::Joined
    } else if is_full(activity) {
        StatusLabel::Full
    } else if is_deadline_passed(activity, now) {
        StatusLabel::DeadlinePassed
    } else {
        StatusLabel::Open
    }
}

pub fn participation_info(
    activity: &Activity,
    viewer: &ViewerId,
    now: DateTime<Utc>,
) -> ParticipationInfo {
    ParticipationInfo {
        ended: is_ended(activity, now),
        is_organizer: is_organizer(activity, viewer),
        can_join: can_join(activity, viewer, now),
        can_leave: can_leave(activity, viewer, now),
        status_text: status_text(activity, viewer, now),
        is_joined: activity.is_joined,
    }
}

/// The rules bound to a clock. Each method reads `now` once.
#[derive(Debug, Clone)]
pub struct ParticipationRules<C> {
    clock: C,
}

impl<C: Clock> ParticipationRules<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_ended(&self, activity: &Activity) -> bool {
        is_ended(activity, self.clock.now())
    }

    pub fn is_organizer(&self, activity: &Activity, viewer: &ViewerId) -> bool {
        is_organizer(activity, viewer)
    }

    pub fn is_started(&self, activity: &Activity) -> bool {
        is_started(activity, self.clock.now())
    }

    pub fn can_join(&self, activity: &Activity, viewer: &ViewerId) -> bool {
        can_join(activity, viewer, self.clock.now())
    }

    pub fn can_leave(&self, activity: &Activity, viewer: &ViewerId) -> bool {
        can_leave(activity, viewer, self.clock.now())
    }

    pub fn status_text(&self, activity: &Activity, viewer: &ViewerId) -> StatusLabel {
        status_text(activity, viewer, self.clock.now())
    }

    pub fn participation_info(&self, activity: &Activity, viewer: &ViewerId) -> ParticipationInfo {
        participation_info(activity, viewer, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::OrganizerRef;
    use chrono::{Duration, TimeZone};

    const CURRENT_USER: &str = "user-current";
    const ORGANIZER: &str = "user-organizer";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 17, 12, 0, 0).unwrap()
    }

    fn viewer() -> ViewerId {
        ViewerId::new(CURRENT_USER)
    }

    fn open_activity() -> Activity {
        Activity {
            id: "act-1".to_string(),
            status: ActivityStatus::Published,
            start_time: now() + Duration::minutes(30),
            end_time: now() + Duration::hours(1),
            registration_deadline: None,
            current_participants: 5,
            max_participants: 10,
            organizer: OrganizerRef {
                id: ORGANIZER.to_string(),
                name: Some("阿明".to_string()),
            },
            is_joined: false,
        }
    }

    #[test]
    fn ended_by_status_ignores_timestamps() {
        for status in [ActivityStatus::Completed, ActivityStatus::Cancelled] {
            let activity = Activity {
                status,
                ..open_activity()
            };
            assert!(is_ended(&activity, now()));
        }
        assert!(!is_ended(&open_activity(), now()));
    }

    #[test]
    fn ended_by_time_ignores_status() {
        for status in [ActivityStatus::Draft, ActivityStatus::Published] {
            let activity = Activity {
                status,
                end_time: now() - Duration::seconds(1),
                ..open_activity()
            };
            assert!(is_ended(&activity, now()));
        }
    }

    #[test]
    fn end_time_itself_is_not_ended() {
        let activity = Activity {
            end_time: now(),
            ..open_activity()
        };
        assert!(!is_ended(&activity, now()));
    }

    #[test]
    fn organizer_match_is_exact() {
        let activity = open_activity();
        assert!(is_organizer(&activity, &ViewerId::new(ORGANIZER)));
        assert!(!is_organizer(&activity, &ViewerId::new("USER-ORGANIZER")));
        assert!(!is_organizer(&activity, &ViewerId::new(" user-organizer")));
    }

    #[test]
    fn started_is_inclusive_and_independent() {
        let mut activity = open_activity();
        assert!(!is_started(&activity, now()));
        activity.start_time = now();
        assert!(is_started(&activity, now()));
        // Started activities stay joinable until they end.
        assert!(can_join(&activity, &viewer(), now()));
    }

    #[test]
    fn join_vetoes_in_order() {
        let base = open_activity();
        assert_eq!(join_veto(&base, &viewer(), now()), None);

        assert_eq!(
            join_veto(&base, &ViewerId::new(ORGANIZER), now()),
            Some(JoinVeto::Organizer)
        );

        let joined = Activity {
            is_joined: true,
            status: ActivityStatus::Cancelled,
            ..base.clone()
        };
        assert_eq!(join_veto(&joined, &viewer(), now()), Some(JoinVeto::AlreadyJoined));

        let cancelled = Activity {
            status: ActivityStatus::Cancelled,
            ..base.clone()
        };
        assert_eq!(join_veto(&cancelled, &viewer(), now()), Some(JoinVeto::Ended));

        let draft = Activity {
            status: ActivityStatus::Draft,
            current_participants: 10,
            ..base.clone()
        };
        assert_eq!(join_veto(&draft, &viewer(), now()), Some(JoinVeto::NotPublished));

        let full = Activity {
            current_participants: 10,
            registration_deadline: Some(now() - Duration::hours(1)),
            ..base.clone()
        };
        assert_eq!(join_veto(&full, &viewer(), now()), Some(JoinVeto::Full));

        let late = Activity {
            registration_deadline: Some(now() - Duration::hours(1)),
            ..base
        };
        assert_eq!(join_veto(&late, &viewer(), now()), Some(JoinVeto::DeadlinePassed));
    }

    #[test]
    fn future_deadline_allows_joining() {
        let activity = Activity {
            registration_deadline: Some(now() + Duration::minutes(5)),
            ..open_activity()
        };
        assert!(can_join(&activity, &viewer(), now()));
        assert_eq!(status_text(&activity, &viewer(), now()), StatusLabel::Open);
    }

    #[test]
    fn deadline_at_now_has_not_passed() {
        let activity = Activity {
            registration_deadline: Some(now()),
            ..open_activity()
        };
        assert!(!is_deadline_passed(&activity, now()));
        assert_eq!(join_veto(&activity, &viewer(), now()), None);
        assert_eq!(status_text(&activity, &viewer(), now()), StatusLabel::Open);
        assert!(is_deadline_passed(&activity, now() + Duration::milliseconds(1)));
    }

    #[test]
    fn over_capacity_counts_as_full() {
        let activity = Activity {
            current_participants: 12,
            ..open_activity()
        };
        assert!(is_full(&activity));
        assert!(!can_join(&activity, &viewer(), now()));
    }

    #[test]
    fn leave_vetoes_in_order() {
        let joined = Activity {
            is_joined: true,
            ..open_activity()
        };
        assert_eq!(leave_veto(&joined, &viewer(), now()), None);
        assert_eq!(
            leave_veto(&joined, &ViewerId::new(ORGANIZER), now()),
            Some(LeaveVeto::Organizer)
        );
        assert_eq!(
            leave_veto(&open_activity(), &viewer(), now()),
            Some(LeaveVeto::NotJoined)
        );

        let finished = Activity {
            end_time: now() - Duration::hours(1),
            ..joined.clone()
        };
        assert_eq!(leave_veto(&finished, &viewer(), now()), Some(LeaveVeto::Ended));

        // Cancelled already counts as ended, so that veto wins.
        let cancelled = Activity {
            status: ActivityStatus::Cancelled,
            ..joined
        };
        assert_eq!(leave_veto(&cancelled, &viewer(), now()), Some(LeaveVeto::Ended));
    }

    #[test]
    fn joined_viewer_of_full_draft_can_still_leave() {
        let activity = Activity {
            status: ActivityStatus::Draft,
            is_joined: true,
            current_participants: 10,
            ..open_activity()
        };
        assert!(can_leave(&activity, &viewer(), now()));
    }

    #[test]
    fn status_text_priority() {
        let base = open_activity();

        let ended_organizer = Activity {
            status: ActivityStatus::Completed,
            is_joined: true,
            ..base.clone()
        };
        assert_eq!(
            status_text(&ended_organizer, &ViewerId::new(ORGANIZER), now()),
            StatusLabel::Ended
        );

        let organizer_full = Activity {
            current_participants: 10,
            is_joined: true,
            ..base.clone()
        };
        assert_eq!(
            status_text(&organizer_full, &ViewerId::new(ORGANIZER), now()),
            StatusLabel::Organized
        );
        assert_eq!(
            status_text(&organizer_full, &viewer(), now()),
            StatusLabel::Joined
        );

        let full_and_late = Activity {
            current_participants: 10,
            registration_deadline: Some(now() - Duration::minutes(1)),
            ..base.clone()
        };
        assert_eq!(status_text(&full_and_late, &viewer(), now()), StatusLabel::Full);

        let late = Activity {
            registration_deadline: Some(now() - Duration::minutes(1)),
            ..base.clone()
        };
        assert_eq!(
            status_text(&late, &viewer(), now()),
            StatusLabel::DeadlinePassed
        );

        // Draft is not joinable but still reads as open.
        let draft = Activity {
            status: ActivityStatus::Draft,
            ..base
        };
        assert_eq!(status_text(&draft, &viewer(), now()), StatusLabel::Open);
    }

    #[test]
    fn labels_serialize_as_display_text() {
        assert_eq!(
            serde_json::to_string(&StatusLabel::DeadlinePassed).unwrap(),
            "\"报名已截止\""
        );
        assert_eq!(StatusLabel::Open.to_string(), "可报名");
    }

    #[test]
    fn info_uses_one_instant() {
        let activity = Activity {
            is_joined: true,
            ..open_activity()
        };
        let rules = ParticipationRules::new(FixedClock(now()));
        let info = rules.participation_info(&activity, &viewer());
        assert_eq!(
            info,
            ParticipationInfo {
                ended: false,
                is_organizer: false,
                can_join: false,
                can_leave: true,
                status_text: StatusLabel::Joined,
                is_joined: true,
            }
        );

        let later = ParticipationRules::new(FixedClock(now() + Duration::hours(2)));
        let info = later.participation_info(&activity, &viewer());
        assert!(info.ended);
        assert!(!info.can_leave);
        assert_eq!(info.status_text, StatusLabel::Ended);
    }

    #[test]
    fn info_serializes_camel_case() {
        let info = participation_info(&open_activity(), &viewer(), now());
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["canJoin"], true);
        assert_eq!(json["isOrganizer"], false);
        assert_eq!(json["statusText"], "可报名");
    }
}
