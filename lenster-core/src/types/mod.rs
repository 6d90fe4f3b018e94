pub use draft::*;
pub use feed::*;
pub use identifiers::*;
pub use metadata::*;
pub use submission::*;
pub use typed_data::*;

mod draft;
mod feed;
mod identifiers;
mod metadata;
mod submission;
mod typed_data;
