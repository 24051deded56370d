pub mod item;
pub mod shared;
