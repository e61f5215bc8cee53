pub mod game_over_panel;
pub mod hud_panel;
pub mod menu_panel;
pub mod touch_controls;
