pub mod activity_card_service;
pub mod activity_status_service;
pub mod participation_service;
