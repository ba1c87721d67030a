pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod enrich;
pub mod errors;
pub mod llm;
pub mod models;
pub mod outreach;
pub mod places;
pub mod utils;
