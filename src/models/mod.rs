pub mod activities;
pub mod viewer;

pub use activities::{
    decode_activity_records, Activity, ActivityRecord, ActivityStatus, OrganizerRef,
};
pub use viewer::ViewerId;
