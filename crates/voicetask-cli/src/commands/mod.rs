pub mod config;
pub mod history;
pub mod noise;
pub mod session;
pub mod tasks;
