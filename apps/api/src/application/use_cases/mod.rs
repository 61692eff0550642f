pub mod assets;
pub mod billing;
pub mod company;
pub mod contacts;
pub mod cross_token;
pub mod notifier;
pub mod partner;
pub mod permission;
