//! Collection types used by the triangulation: arena storage, fast hash
//! maps and sets, inline buffers and key-indexed side tables.

mod aliases;
mod buffers;
mod helpers;
mod secondary_maps;

pub use aliases::*;
pub use buffers::*;
pub use helpers::*;
pub use secondary_maps::*;
