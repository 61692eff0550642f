pub mod billing_event;
pub mod gateway;
pub mod membership;
pub mod partner;
pub mod subscription;
