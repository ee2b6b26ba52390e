mod analyzer;
mod clock;
mod dispatcher;
mod email;
mod error;
mod ledger;
pub mod models;
mod monitor;
pub mod ports;
mod projector;
mod strategist;
pub mod violations;

pub use analyzer::*;
pub use clock::*;
pub use dispatcher::*;
pub use email::*;
pub use error::*;
pub use ledger::*;
pub use monitor::*;
pub use projector::*;
pub use strategist::*;
pub use violations::*;
