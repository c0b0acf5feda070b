//! eframe shell: renders the projected view and forwards user intents to the controller.

pub mod app;

pub use app::ConsultantApp;
