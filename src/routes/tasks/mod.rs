mod approve;
mod complete;
mod create_task;
mod pledge;

pub use approve::approve;
pub use complete::complete;
pub use create_task::create_task;
pub use pledge::pledge;
