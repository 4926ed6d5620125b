pub mod config;
pub mod drivers;
pub mod ops;
pub mod run;
pub mod templates;
