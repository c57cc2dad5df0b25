pub mod availability;
pub mod calendar;
pub mod codec;
pub mod models;
pub mod query;
pub mod store;
