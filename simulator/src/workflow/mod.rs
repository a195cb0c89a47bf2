pub mod capabilities;
pub mod config;
pub mod regressor;
pub mod runner;
