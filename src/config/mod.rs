mod models;
pub mod rt;

pub use models::*;
