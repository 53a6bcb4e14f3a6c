pub mod composer;
pub mod event;
pub mod model_menu;
pub mod panes;
