pub mod blocks;
pub mod client;
