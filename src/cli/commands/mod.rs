//! Command implementations for the poddigest CLI.

mod chunk;
mod fetch;

pub use chunk::run_chunk;
pub use fetch::run_fetch;
