pub mod filters;
pub mod limit;
