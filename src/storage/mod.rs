pub mod archive;
pub mod files;

pub use archive::Archiver;
