pub mod app;
pub mod asaas_client;
pub mod config;
pub mod db;
pub mod error;
pub mod http_client;
pub mod object_storage;
pub mod product_webhook_client;
pub mod setup;
pub mod webhook_signature;
