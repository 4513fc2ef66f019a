pub mod debug;
pub mod list;
pub mod maps;
pub mod simulate;
