use eframe::egui::Ui;

pub mod accounts;
pub mod settings;

pub use accounts::*;
pub use settings::*;

pub trait View: Sized {
    fn ui(self, ui: &mut Ui);
}
