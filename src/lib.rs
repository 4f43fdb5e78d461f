pub mod access;
pub mod config;
pub mod database;
pub mod repl;
pub mod storage;
