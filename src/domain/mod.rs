mod credits;
mod data_stores;
mod error;
pub mod lifecycle;
mod member;
mod member_id;
mod member_name;
mod payout;
mod receipts;
mod task;
mod task_id;
mod task_title;

pub use credits::*;
pub use data_stores::*;
pub use error::*;
pub use member::*;
pub use member_id::*;
pub use member_name::*;
pub use payout::*;
pub use receipts::*;
pub use task::*;
pub use task_id::*;
pub use task_title::*;
