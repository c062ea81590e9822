pub mod app;
pub mod ui;

pub use app::App;
pub use ui::run_tui;
