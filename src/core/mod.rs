pub mod extractor;
pub mod scraper;
pub mod service;

pub use crate::domain::model::ReviewSnapshot;
pub use crate::domain::ports::{
    CacheStore, CacheWriteMode, ConfigProvider, PageClient, PageResponse, ReviewProvider,
    ReviewSource,
};
pub use crate::utils::error::Result;
