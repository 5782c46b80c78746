pub mod file_sink;
pub mod http_client;
pub mod local_source;
pub mod product_api;
pub mod webdav_store;
