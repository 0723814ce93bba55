pub mod auth;
pub mod content;
pub mod markdown;
pub mod server;
pub mod slug;
pub mod storage;
