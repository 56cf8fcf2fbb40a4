pub mod results;
pub mod scoresheet;
