pub mod category;
pub mod storage;

#[cfg(feature = "sea-orm")]
pub mod credentials;
#[cfg(feature = "sea-orm")]
pub mod database;
#[cfg(feature = "sea-orm")]
pub mod entity;
#[cfg(feature = "sea-orm")]
pub mod keywords;
#[cfg(feature = "sea-orm")]
pub mod metadata;

pub use category::Category;
