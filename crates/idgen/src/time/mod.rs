mod interface;
mod manual;
mod mono_clock;
mod scale;

pub use interface::*;
pub use manual::*;
pub use mono_clock::*;
pub(crate) use scale::*;
