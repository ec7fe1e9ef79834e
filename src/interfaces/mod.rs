//! Interface adapters - REST API over the user service

pub mod http;

pub use http::create_api_router;
