//! Command implementations.

mod rewrite;

pub use rewrite::{rewrite, RewriteOptions, RewriteReport};
