pub mod constants;
pub mod descriptor;

pub use constants::*;
pub use descriptor::{CodecDescriptor, DescriptorHeader};
