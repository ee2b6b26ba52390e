mod employee;
mod ids;
mod risk;
mod shift;
mod time_entry;
mod week;

pub use employee::*;
pub use ids::*;
pub use risk::*;
pub use shift::*;
pub use time_entry::*;
pub use week::*;
