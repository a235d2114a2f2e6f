mod codec;
mod decoded;

pub use codec::*;
pub use decoded::*;
