pub mod actions;
pub mod key_mapper;
pub mod pager_tui;
pub mod session;
pub mod table_renderer;
pub mod viewport;
pub mod viewport_manager;
