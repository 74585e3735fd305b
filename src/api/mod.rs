mod client;

pub use client::HttpApiClient;
