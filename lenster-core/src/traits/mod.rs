pub use publication::*;
pub use signing::*;
pub use storage::*;
pub use submitter::*;

mod publication;
mod signing;
mod storage;
mod submitter;
