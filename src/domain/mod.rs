pub mod config;
pub mod detection;
pub mod errors;
pub mod geometry;
pub mod overlay;
pub mod sensor;
pub mod status;
