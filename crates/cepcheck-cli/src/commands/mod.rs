pub mod check;
pub mod config;
pub mod mask;
pub mod run;
