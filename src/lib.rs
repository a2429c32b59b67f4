pub mod common;
pub mod layout_engine;
