mod atomic;
mod interface;
mod iter;
mod lock;
mod mutex;
mod options;
mod state;
mod strategy;

pub use atomic::*;
pub use interface::*;
pub use iter::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use options::*;
pub(crate) use state::*;
pub use strategy::*;
