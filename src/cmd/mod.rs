pub mod config;
pub mod fetch;
pub mod query;
pub mod serve;
