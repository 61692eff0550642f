pub mod object_storage;
pub mod pix_transfer;
pub mod product_webhook;
