pub mod inserter;
pub mod query;
