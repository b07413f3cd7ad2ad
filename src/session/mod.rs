pub mod answer;
pub mod report;
pub mod summary;
pub mod tracker;
pub mod trial;
