use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Movie, MovieDetail, Page, Video};

#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn web_url(&self, id: u64) -> String;

    // Core (required)
    async fn popular(&self, page: u32) -> Result<Page<Movie>>;
    async fn search(&self, query: &str, page: u32) -> Result<Page<Movie>>;
    async fn movie_detail(&self, id: u64) -> Result<MovieDetail>;

    // Optional (default impls for catalogs without video listings)
    async fn trailer(&self, _id: u64) -> Result<Option<Video>> {
        Ok(None)
    }
}
