pub mod app_config;
pub mod http_client;
pub mod json_source;

pub use http_client::ReqwestHttpClient;
pub use json_source::JsonFileSource;
