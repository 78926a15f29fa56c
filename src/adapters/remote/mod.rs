pub mod config_client;
pub mod whep;
