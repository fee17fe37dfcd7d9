pub mod assets;
pub mod auth;
pub mod delete;
pub mod download;
pub mod keywords;
pub mod search;
pub mod upload;
