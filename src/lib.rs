pub mod cli;
pub mod codec;
pub mod convert;
pub mod error;
pub mod icodir;
pub mod logger;
pub mod sizes;

pub use codec::{Codec, ImageCodec};
pub use convert::{Converted, Converter, Outcome};
pub use error::{Capability, ConvertError, Failure};
pub use icodir::{IconDir, IconEntry};
pub use sizes::IconSizes;
