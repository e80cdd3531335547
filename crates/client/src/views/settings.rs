use eframe::egui::{self, TextEdit};
use egui_file_dialog::FileDialog;
use relog_core::{store::AccountStore, DOT_RELOG_ACCOUNTS_CONFIG};

use crate::errors_pool::ErrorPoolExt;

use super::View;

/// Which path field the open file dialog is going to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPick {
    LauncherConfig,
    Game,
    Options,
}

/// The three paths the tool works with, editable as plain text and
/// through the file dialog. Every change is written back to the store's
/// last-used paths so the next start picks them up.
#[derive(Debug, Default, Clone)]
pub struct SettingsState {
    pub launcher_config: String,
    pub game: String,
    pub options: String,
}

impl SettingsState {
    pub fn from_store(store: &AccountStore) -> Self {
        Self {
            launcher_config: store.paths.launcher_config.clone().unwrap_or_default(),
            game: store.paths.game.clone().unwrap_or_default(),
            options: store.paths.options.clone().unwrap_or_default(),
        }
    }
}

pub struct SettingsView<'a> {
    pub state: &'a mut SettingsState,
    pub store: &'a mut AccountStore,
    pub file_dialog: &'a mut FileDialog,
    pub picking: &'a mut Option<PathPick>,
}

impl SettingsView<'_> {
    fn path_field(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut String,
        file_dialog: &mut FileDialog,
        picking: &mut Option<PathPick>,
        pick: PathPick,
    ) -> bool {
        let mut changed = false;

        ui.label(label);
        ui.horizontal(|ui| {
            // Persist on focus loss, not on every keystroke.
            let response = ui.add(TextEdit::singleline(value).desired_width(260.0));
            changed = response.lost_focus();
            if ui.button("Browse").clicked() {
                *picking = Some(pick);
                file_dialog.select_file();
            }
        });

        changed
    }

    fn sync_to_store(state: &SettingsState, store: &mut AccountStore) {
        let optional = |s: &String| (!s.is_empty()).then(|| s.clone());

        store.paths.launcher_config = optional(&state.launcher_config);
        store.paths.game = optional(&state.game);
        store.paths.options = optional(&state.options);

        store
            .save_sync(DOT_RELOG_ACCOUNTS_CONFIG)
            .report_error_with_context("Cannot save the accounts store");
    }
}

impl View for SettingsView<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        let mut changed = false;

        changed |= Self::path_field(
            ui,
            "Launcher config (.launcher):",
            &mut self.state.launcher_config,
            self.file_dialog,
            self.picking,
            PathPick::LauncherConfig,
        );
        changed |= Self::path_field(
            ui,
            "Game executable:",
            &mut self.state.game,
            self.file_dialog,
            self.picking,
            PathPick::Game,
        );
        changed |= Self::path_field(
            ui,
            "options.txt (optional):",
            &mut self.state.options,
            self.file_dialog,
            self.picking,
            PathPick::Options,
        );

        if let Some(path) = self.file_dialog.update(ui.ctx()).selected() {
            if let Some(pick) = self.picking.take() {
                let path = path.display().to_string();
                match pick {
                    PathPick::LauncherConfig => self.state.launcher_config = path,
                    PathPick::Game => self.state.game = path,
                    PathPick::Options => self.state.options = path,
                }
                changed = true;
            }
        }

        if changed {
            Self::sync_to_store(self.state, self.store);
        }
    }
}
