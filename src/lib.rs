pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod relay_client;
pub mod render;
pub mod session;
pub mod upstream;
pub mod web_server;
pub mod wire;
