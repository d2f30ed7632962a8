//! External data-source clients

pub mod news;
pub mod yahoo;

pub use news::{NewsClient, NewsItem};
pub use yahoo::YahooClient;
