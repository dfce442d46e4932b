pub mod fetch;

pub use fetch::{fetch_text, FetchOptions, FetchResult};
