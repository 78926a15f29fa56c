pub mod feeds;
pub mod http;
pub mod remote;
pub mod surface;
