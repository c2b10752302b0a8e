pub mod crawl;
pub mod post;

pub use crawl::CrawlState;
pub use post::PostRecord;
