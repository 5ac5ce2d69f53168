//! sqlrewrite - Rule-based logical plan rewrite engine for a distributed SQL query optimizer
//!
//! This crate matches shape patterns against a query's logical operator tree and
//! replaces matched subtrees with cheaper, semantically equivalent alternatives,
//! propagating the columns each node must produce from the root down to the scans.

pub mod config;
pub mod core;
pub mod query;
pub mod utils;
