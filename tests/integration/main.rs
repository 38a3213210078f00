#[path = "../common/mod.rs"]
mod common;

mod config_tests;
mod env_tests;
mod plugin_tests;
mod server_tests;
