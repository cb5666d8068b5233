pub mod command;
pub mod packet;
pub mod primitive;
pub mod value;

pub use value::{NullBitmap, ParamType, ParamValue};
