pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, ParticipationError};
pub use models::{Activity, ActivityRecord, ActivityStatus, OrganizerRef, ViewerId};
pub use services::participation_service::{
    JoinVeto, LeaveVeto, ParticipationInfo, ParticipationRules, StatusLabel,
};
