pub mod api;
pub mod budget;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod screen;
pub mod tree;
