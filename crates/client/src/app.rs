use std::{collections::HashSet, time::Duration};

use eframe::egui::{self, RichText, Slider};
use egui_file_dialog::FileDialog;
use relog_core::{
    launch::{self, Account, LaunchBatch, LaunchEvent},
    launcher_config, options,
    store::AccountStore,
    DOT_RELOG_ACCOUNTS_CONFIG, RELOG_NAME,
};
use tokio::runtime::Handle;

use crate::{
    channel::Channel,
    errors_pool::{ErrorPoolExt, ERRORS_POOL},
    toasts,
    views::{AccountsView, PathPick, SettingsState, SettingsView, View},
};

pub struct App {
    runtime: Handle,

    store: AccountStore,
    selected: HashSet<String>,
    settings: SettingsState,

    memory_amount: u32,
    render_distance: u32,
    max_fps: u32,

    file_dialog: FileDialog,
    picking: Option<PathPick>,

    launch_events: Channel<LaunchEvent>,
    is_launching: bool,
    status: String,

    is_settings_window_open: bool,
}

impl App {
    pub fn new(runtime: Handle) -> Self {
        let store = AccountStore::load(DOT_RELOG_ACCOUNTS_CONFIG);
        let settings = SettingsState::from_store(&store);

        Self {
            runtime,
            store,
            selected: HashSet::new(),
            settings,
            memory_amount: 1024,
            render_distance: 8,
            max_fps: 60,
            file_dialog: FileDialog::new(),
            picking: None,
            launch_events: Channel::new(100),
            is_launching: false,
            status: String::new(),
            is_settings_window_open: false,
        }
    }

    /// Reads the launcher config's active account and stores it under
    /// its nickname.
    fn load_active_account(&mut self) {
        if self.settings.launcher_config.is_empty() {
            toasts::add(|toasts| toasts.warning("Set the launcher config path first"));
            return;
        }

        let account = self
            .runtime
            .block_on(launcher_config::active_account(&self.settings.launcher_config));

        if let Some(account) = account.report_error() {
            if !account.has_token() {
                toasts::add(|toasts| {
                    toasts.warning(format!(
                        "The launcher has no token for `{}`",
                        account.nickname
                    ))
                });
                return;
            }

            let nickname = account.nickname.clone();
            self.store.add_account(account.nickname, account.token);
            self.store
                .save_sync(DOT_RELOG_ACCOUNTS_CONFIG)
                .report_error_with_context("Cannot save the accounts store");
            toasts::add(|toasts| toasts.success(format!("Account `{nickname}` is saved")));
        }
    }

    fn save_memory_amount(&mut self) {
        if self.settings.launcher_config.is_empty() {
            toasts::add(|toasts| toasts.warning("Set the launcher config path first"));
            return;
        }

        let result = self.runtime.block_on(launcher_config::set_memory_amount(
            &self.settings.launcher_config,
            self.memory_amount,
        ));

        if result.report_error().is_some() {
            toasts::add(|toasts| toasts.success("Memory amount is updated"));
        }
    }

    fn save_display_options(&mut self) {
        if self.settings.options.is_empty() {
            toasts::add(|toasts| toasts.warning("Set the options.txt path first"));
            return;
        }

        let result = self.runtime.block_on(options::apply_display_settings(
            &self.settings.options,
            self.max_fps,
            self.render_distance,
        ));

        if result.report_error().is_some() {
            toasts::add(|toasts| toasts.success("Display options are updated"));
        }
    }

    fn launch(&mut self, accounts: Vec<Account>) {
        if accounts.is_empty() {
            toasts::add(|toasts| toasts.warning("Select at least one account"));
            return;
        }
        if self.settings.launcher_config.is_empty() || self.settings.game.is_empty() {
            toasts::add(|toasts| {
                toasts.warning("Set the launcher config and the game executable paths first")
            });
            return;
        }

        let batch = LaunchBatch::new(
            accounts,
            &self.settings.launcher_config,
            &self.settings.game,
        );

        self.is_launching = true;
        self.status = "Launching...".to_owned();
        self.runtime
            .spawn(launch::run(batch, self.launch_events.clone_tx()));
    }

    fn launch_selected(&mut self) {
        let accounts = self
            .store
            .accounts()
            .iter()
            .filter(|(nickname, _)| self.selected.contains(nickname.as_str()))
            .map(|(nickname, token)| Account::new(nickname, token))
            .collect();
        self.launch(accounts);
    }

    fn launch_all(&mut self) {
        let accounts = self
            .store
            .accounts()
            .iter()
            .map(|(nickname, token)| Account::new(nickname, token))
            .collect();
        self.launch(accounts);
    }

    fn drain_launch_events(&mut self) {
        while let Ok(event) = self.launch_events.try_recv() {
            match event {
                LaunchEvent::Switched { nickname } => {
                    self.status = format!("Switched the launcher to `{nickname}`");
                }
                LaunchEvent::Spawned { nickname } => {
                    self.status = format!("Launched the game for `{nickname}`");
                }
                LaunchEvent::Failed { nickname, error } => {
                    self.status = format!("`{nickname}` failed");
                    Err::<(), _>(error).report_error();
                }
                LaunchEvent::Finished { launched, failed } => {
                    self.is_launching = false;
                    self.status = format!("Batch finished: {launched} launched, {failed} failed");
                    toasts::add(|toasts| {
                        toasts.info(format!("Batch finished: {launched} launched, {failed} failed"))
                    });
                }
            }
        }
    }

    fn show_errors_window(&self, ctx: &egui::Context) {
        if ERRORS_POOL.read().is_empty() {
            return;
        }

        egui::Window::new("Errors").resizable(true).show(ctx, |ui| {
            for error in ERRORS_POOL.read().iter_errors() {
                ui.label(RichText::new(format!("{error}")).color(ui.visuals().error_fg_color));
            }
            if ui.button("Clear").clicked() {
                ERRORS_POOL.write().clear();
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_launch_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RELOG_NAME);
                if ui.button("Settings").clicked() {
                    self.is_settings_window_open = !self.is_settings_window_open;
                }
            });

            ui.separator();

            ui.add(Slider::new(&mut self.memory_amount, 1024..=8192).text("Memory (MB)"));
            ui.add(Slider::new(&mut self.render_distance, 0..=32).text("Render distance"));
            ui.add(Slider::new(&mut self.max_fps, 1..=255).text("Max FPS"));

            ui.horizontal(|ui| {
                if ui.button("Save options").clicked() {
                    self.save_display_options();
                }
                if ui.button("Save memory").clicked() {
                    self.save_memory_amount();
                }
                if ui.button("Load account").clicked() {
                    self.load_active_account();
                }
            });

            ui.horizontal(|ui| {
                let can_launch = !self.is_launching;
                if ui
                    .add_enabled(can_launch, egui::Button::new("Launch selected"))
                    .clicked()
                {
                    self.launch_selected();
                }
                if ui
                    .add_enabled(can_launch, egui::Button::new("Launch all"))
                    .clicked()
                {
                    self.launch_all();
                }
            });

            if !self.status.is_empty() {
                ui.label(&self.status);
            }

            ui.separator();

            AccountsView {
                store: &mut self.store,
                selected: &mut self.selected,
                is_allowed_to_take_action: !self.is_launching,
            }
            .ui(ui);
        });

        let mut is_settings_window_open = self.is_settings_window_open;
        egui::Window::new("Settings")
            .open(&mut is_settings_window_open)
            .resizable(false)
            .show(ctx, |ui| {
                SettingsView {
                    state: &mut self.settings,
                    store: &mut self.store,
                    file_dialog: &mut self.file_dialog,
                    picking: &mut self.picking,
                }
                .ui(ui);
            });
        self.is_settings_window_open = is_settings_window_open;

        self.show_errors_window(ctx);

        toasts::show(ctx);

        if self.is_launching {
            // The launch events arrive from a background task; keep
            // repainting so they show up without user input.
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
