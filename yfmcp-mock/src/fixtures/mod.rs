pub mod chart;
pub mod options;
pub mod search;
pub mod summary;
