pub mod hash;
pub mod map;
