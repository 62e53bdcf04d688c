pub mod excel;
pub mod record_store;
