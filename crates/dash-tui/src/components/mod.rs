pub mod drawer;
pub mod help_overlay;
pub mod navbar;
pub mod widget_grid;
