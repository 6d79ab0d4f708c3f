pub mod backends;
pub mod query;
