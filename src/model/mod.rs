//! Core model types.

mod body_line;
mod code_block;
mod outcome;

pub use body_line::{BodyLine, LineKind};
pub use code_block::{BlockKind, CodeBlock, Fence, CODE_CELL_DIRECTIVE};
pub use outcome::{BlockError, RunResult};
