pub mod challenge;
pub mod gems;
pub mod level;
pub mod sequence;

pub use level::{Level, Verdict};
