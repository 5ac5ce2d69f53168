//! 算子合并规则

pub mod merge_two_filters;

pub use merge_two_filters::MergeTwoFiltersRule;
