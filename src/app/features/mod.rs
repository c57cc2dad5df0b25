pub mod browse;
pub mod composer;
pub mod conversation;
pub mod editor;
pub mod store;
pub mod ui;
