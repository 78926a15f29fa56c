pub mod dto;
pub mod feed_store;
pub mod mapper;
pub mod ports;
pub mod render;
pub mod services;
pub mod supervisor;
pub mod surface;
pub mod video;
