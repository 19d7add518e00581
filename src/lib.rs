pub mod category;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;
pub mod output;
pub mod patch;
pub mod report;
pub mod runner;
pub mod syntax;
