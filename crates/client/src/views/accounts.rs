use std::collections::HashSet;

use eframe::egui::{self, RichText, ScrollArea};
use relog_core::{launch::Account, store::AccountStore, DOT_RELOG_ACCOUNTS_CONFIG};

use crate::{errors_pool::ErrorPoolExt, toasts};

use super::View;

pub struct AccountsView<'a> {
    pub store: &'a mut AccountStore,
    pub selected: &'a mut HashSet<String>,
    /// Deleting accounts while a batch is running would launch under a
    /// different list than the one the user confirmed.
    pub is_allowed_to_take_action: bool,
}

impl View for AccountsView<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        if self.store.accounts().is_empty() {
            ui.label(RichText::new("No saved accounts yet").color(ui.visuals().weak_text_color()));
            return;
        }

        let mut to_delete = None;

        ScrollArea::vertical().show(ui, |ui| {
            for (nickname, token) in self.store.accounts() {
                ui.horizontal(|ui| {
                    let mut checked = self.selected.contains(nickname);
                    if ui.checkbox(&mut checked, nickname).changed() {
                        if checked {
                            self.selected.insert(nickname.clone());
                        } else {
                            self.selected.remove(nickname);
                        }
                    }

                    ui.label(
                        RichText::new(Account::new(nickname, token).masked()).monospace(),
                    );

                    if ui
                        .add_enabled(self.is_allowed_to_take_action, egui::Button::new("Delete"))
                        .clicked()
                    {
                        to_delete = Some(nickname.clone());
                    }
                });
            }
        });

        if let Some(nickname) = to_delete {
            self.selected.remove(&nickname);
            if self.store.delete_account(&nickname).report_error().is_some() {
                self.store
                    .save_sync(DOT_RELOG_ACCOUNTS_CONFIG)
                    .report_error_with_context("Cannot save the accounts store");
                toasts::add(|toasts| toasts.success(format!("Account `{nickname}` is deleted")));
            }
        }
    }
}
