pub mod cache;
pub mod config;
pub mod identify;
pub mod interactive;
pub mod lookup;
pub mod render;
