pub mod app_error;
pub mod gateway_events;
pub mod jwt;
pub mod ports;
pub mod use_cases;
pub mod validators;
