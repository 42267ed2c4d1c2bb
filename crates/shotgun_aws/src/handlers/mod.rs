pub mod consumer;
pub mod crawl_driver;
pub mod launcher;
