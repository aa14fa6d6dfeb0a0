pub mod dispatch;
pub mod list;
pub mod run_all;
pub mod run_one;
pub mod shared;
pub mod show;
mod verdict;
