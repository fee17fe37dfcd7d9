pub mod content_keyword;
pub mod content_metadata;
pub mod keyword_count;
pub mod user;
