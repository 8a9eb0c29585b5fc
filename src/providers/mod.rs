pub mod frankfurter;
pub mod http;

pub use frankfurter::FrankfurterProvider;
pub use http::{FetchResponse, HttpClient, HttpFetcher};
