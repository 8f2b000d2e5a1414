mod battle;
mod system;
mod players;
mod trade;
mod transactions;

pub use battle::*;
pub use system::*;
pub use players::*;
pub use trade::*;
pub use transactions::*;
