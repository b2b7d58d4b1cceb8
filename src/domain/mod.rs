mod account;
mod balance;
mod money;
mod month;
mod transaction;
mod validation;

pub use account::*;
pub use balance::*;
pub use money::*;
pub use month::*;
pub use transaction::*;
pub use validation::*;
