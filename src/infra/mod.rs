pub mod file;
pub mod mockapi;
