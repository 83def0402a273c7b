pub mod buttons;
pub mod hud;
pub mod menu;
