// Library half of treepick - exposes the core modules for testing

pub mod app;
pub mod artifact;
pub mod config;
pub mod config_io;
pub mod services;
pub mod view;
