pub mod aggregate;
pub mod encodings;
pub mod export;
pub mod http_client;
pub mod pitch;
pub mod provider;
pub mod state;
pub mod store;
