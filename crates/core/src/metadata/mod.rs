//! Tag reading and writing.
//!
//! Each container format has its own [`MetadataAdapter`]; the
//! [`AdapterRegistry`] picks one from the file extension. All adapters go
//! through lofty and write atomically: the tag is written into a temporary
//! sibling copy which then replaces the original.

mod error;
mod flac;
mod generic;
mod lofty_io;
mod mp3;
mod mp4;
mod ogg;
mod registry;
mod traits;
mod types;

pub use error::MetadataError;
pub use flac::FlacAdapter;
pub use generic::GenericAdapter;
pub use mp3::Mp3Adapter;
pub use mp4::Mp4Adapter;
pub use ogg::OggAdapter;
pub use registry::AdapterRegistry;
pub use traits::MetadataAdapter;
pub use types::{AudioFile, ContainerFormat, TagPatch, TagSnapshot};
