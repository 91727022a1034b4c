pub mod bundle;
pub mod target_start;

pub use target_start::TargetStartIndex;
