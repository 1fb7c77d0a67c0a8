mod board;
mod get_state;
pub mod tasks;

pub use board::*;
pub use get_state::*;
