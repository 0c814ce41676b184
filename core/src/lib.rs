pub mod action;
pub mod command;
pub mod config;
pub mod fixture;
pub mod lang;
pub mod style;
pub mod testing;

pub use crate::config::Config;
