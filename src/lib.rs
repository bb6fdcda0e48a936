pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod llm;
pub mod quiz;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;
