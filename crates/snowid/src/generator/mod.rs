mod atomic;
mod basic;
mod interface;
mod lock;
mod mutex;
mod state;
mod status;

pub use atomic::*;
pub use basic::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
pub(crate) use state::*;
pub use status::*;
