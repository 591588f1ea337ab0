pub mod client;
pub mod types;

pub use client::VllmClient;
pub use types::RequestBuilder;
