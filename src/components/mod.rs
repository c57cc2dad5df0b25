pub mod chat_log;
pub mod composer;
pub mod footer;
pub mod header;
pub mod palette;
pub mod popup;
