use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParticipationError {
    #[error("activity {activity_id}: invalid timestamp in `{field}`: {value:?}")]
    InvalidTimestamp {
        activity_id: String,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("activity {activity_id}: missing required field `{field}`")]
    MissingField {
        activity_id: String,
        field: &'static str,
    },

    #[error("activity {activity_id}: unknown status {status:?}")]
    UnknownStatus { activity_id: String, status: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (in the environment or .env)")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}
