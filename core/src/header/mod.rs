pub mod decode;
pub mod encode;
pub mod types;

pub use decode::decode_header_le;
pub use encode::encode_header_le;
pub use types::{ContainerHeader, HeaderError};
