mod app;
mod config;
mod effects;
mod logging;
mod selection;
mod ui;

pub use app::run_app;
