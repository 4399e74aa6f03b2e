pub mod bitmap;
pub mod items;
pub mod ticker;
