pub mod repository;

mod album;
mod asset;
mod event;
mod id_types;
pub use album::*;
pub use asset::*;
pub use event::*;
pub use id_types::*;

pub mod util;
