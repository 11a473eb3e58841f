pub mod articles;
pub mod comments;
pub mod common;
pub mod debug;
pub mod header;
pub mod help;
pub mod status_bar;
