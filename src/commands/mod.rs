pub mod check;
pub mod config;
pub mod notify;
pub mod run;
