pub mod ws_channel;
