pub mod mock;
mod notification;
mod time_ledger;
mod workforce;

pub use notification::*;
pub use time_ledger::*;
pub use workforce::*;
