pub mod hello;
pub mod image;
pub mod item;
