pub mod config;
mod config_env;
pub mod contacts;
pub mod llm;
pub mod notify;
pub mod schedule;
