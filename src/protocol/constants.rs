//! Descriptor file constants

/// Descriptor magic bytes: "HUFD"
pub const DESCRIPTOR_MAGIC: [u8; 4] = *b"HUFD";

/// Current descriptor layout version
pub const DESCRIPTOR_VERSION: u16 = 1;

/// Upper bound for a descriptor body. A 256-leaf tree plus its code table
/// needs a few kilobytes.
pub const MAX_DESCRIPTOR_BODY: u64 = 16 * 1024 * 1024;

/// Appended to the payload path to name its descriptor
pub const DEFAULT_DESCRIPTOR_SUFFIX: &str = ".desc";
