pub mod enum_meta;
pub mod misc;
