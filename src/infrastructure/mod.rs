pub mod notion_adapter;
