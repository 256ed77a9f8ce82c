//! Main application UI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Color32, Layout, RichText};
use egui_phosphor::regular::TRASH;
use reqwest::StatusCode;
use tokio::sync::mpsc;

use crate::auth::{KeyValueStore, TOKEN_KEY, TokenProvider};
use crate::client::AbsensiClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::attendance::AttendanceRecord;
use crate::routes::Route;
use crate::screen::{EditAbsen, NoticeLevel, Notification};

use super::components::colors;
use super::{edit_absen, list_placeholder};

/// Messages from async tasks to UI.
pub enum UiMessage {
    RecordLoaded {
        id: String,
        generation: u64,
        result: Result<AttendanceRecord>,
    },
    RecordUpdated {
        id: String,
        generation: u64,
        result: Result<()>,
    },
    ConnectionTested(std::result::Result<StatusCode, String>),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Connection settings dialog state.
#[derive(Default)]
struct SettingsDialog {
    open: bool,
    base_url: String,
    token: String,
    testing: bool,
    test_status: Option<std::result::Result<StatusCode, String>>,
}

/// Main application state.
pub struct App {
    // Runtime and API
    rt: tokio::runtime::Runtime,
    client: AbsensiClient,
    store: KeyValueStore,
    has_token: bool,

    // Message channel for async communication
    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    route: Route,
    title_dirty: bool,

    // Screens
    edit: Option<EditAbsen>,
    open_id_input: String,

    // Dialogs
    notification: Option<Notification>,
    settings: SettingsDialog,

    // Log messages
    log_messages: Vec<LogEntry>,
    log_open: bool,

    // Configuration
    config: AppConfig,
    config_path: PathBuf,
}

impl App {
    pub fn new(
        rt: tokio::runtime::Runtime,
        client: AbsensiClient,
        store: KeyValueStore,
        config: AppConfig,
        config_path: PathBuf,
        start: Route,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let has_token = store.token().is_some();

        let mut app = Self {
            rt,
            client,
            store,
            has_token,
            tx,
            rx,
            route: Route::Absen,
            title_dirty: true,
            edit: None,
            open_id_input: String::new(),
            notification: None,
            settings: SettingsDialog::default(),
            log_messages: Vec::new(),
            log_open: false,
            config,
            config_path,
        };

        app.navigate(start);
        app
    }

    /// Log a message to the UI log.
    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Clear the activity log.
    fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Show a notification dialog and record it in the log.
    fn notify(&mut self, notification: Notification) {
        let level = match notification.level {
            NoticeLevel::Success => LogLevel::Success,
            NoticeLevel::Error => LogLevel::Error,
        };
        self.log(level, format!("{}: {}", notification.title, notification.message));
        self.notification = Some(notification);
    }

    /// Switch screens.
    ///
    /// Entering the edit route for a different record (or from another
    /// screen) creates a fresh edit state and starts its fetch. Staying on
    /// the same record does nothing.
    pub fn navigate(&mut self, route: Route) {
        if route == self.route && (self.edit.is_some() || route.record_id().is_none()) {
            return;
        }

        tracing::info!("Navigate: {} -> {}", self.route, route);
        self.edit = route.record_id().map(EditAbsen::new);
        self.route = route;
        self.title_dirty = true;
        self.log(LogLevel::Info, format!("Opened {}", self.route));

        if self.edit.is_some() {
            self.load_record();
        }
    }

    /// Fetch the record for the active edit screen.
    fn load_record(&mut self) {
        let Some(screen) = self.edit.as_mut() else {
            return;
        };
        let generation = screen.begin_load();
        let id = screen.id().to_string();
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = client.fetch_record(&id).await;
            let _ = tx.send(UiMessage::RecordLoaded { id, generation, result });
        });
    }

    /// Submit the active edit form.
    fn submit(&mut self) {
        let Some(screen) = self.edit.as_mut() else {
            return;
        };
        let Some((generation, update)) = screen.begin_submit() else {
            return;
        };
        let id = screen.id().to_string();
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = client.update_record(&id, &update).await;
            let _ = tx.send(UiMessage::RecordUpdated { id, generation, result });
        });
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::RecordLoaded { id, generation, result } => {
                    let notice = match self.edit.as_mut() {
                        Some(screen) if screen.id() == id => screen.finish_load(generation, result),
                        _ => {
                            tracing::debug!("Dropping load result for absensi {} (screen left)", id);
                            None
                        }
                    };
                    if let Some(notice) = notice {
                        self.notify(notice);
                    }
                }
                UiMessage::RecordUpdated { id, generation, result } => {
                    let outcome = match self.edit.as_mut() {
                        Some(screen) if screen.id() == id => screen.finish_submit(generation, result),
                        _ => {
                            tracing::debug!("Dropping update result for absensi {} (screen left)", id);
                            None
                        }
                    };
                    if let Some(outcome) = outcome {
                        self.notify(outcome.notification);
                        if let Some(route) = outcome.navigate {
                            self.navigate(route);
                        }
                    }
                }
                UiMessage::ConnectionTested(result) => {
                    self.settings.testing = false;
                    self.settings.test_status = Some(result);
                }
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.settings.testing
            || self
                .edit
                .as_ref()
                .is_some_and(|screen| screen.is_loading() || screen.is_submitting())
    }

    fn page_title(&self) -> String {
        let page = match &self.route {
            Route::EditAbsen(_) => edit_absen::PAGE_TITLE,
            other => list_placeholder::title(other),
        };
        format!("{page} - Absensi Editor")
    }

    fn open_settings(&mut self) {
        self.settings = SettingsDialog {
            open: true,
            base_url: self.config.api.base_url.clone(),
            token: self.store.token().unwrap_or_default(),
            ..Default::default()
        };
    }

    /// Start API connection test with the URL typed in the dialog.
    fn test_api_connection(&mut self) {
        let url = self.settings.base_url.trim().to_string();
        let client = match AbsensiClient::new(&url, Duration::from_secs(5), Arc::new(self.store.clone())) {
            Ok(client) => client,
            Err(e) => {
                self.settings.test_status = Some(Err(e.to_string()));
                return;
            }
        };

        self.settings.testing = true;
        self.settings.test_status = None;
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = client.test_connection().await.map_err(|e| e.to_string());
            let _ = tx.send(UiMessage::ConnectionTested(result));
        });
    }

    /// Persist the connection settings and rebuild the client.
    fn save_settings(&mut self) -> std::result::Result<(), String> {
        let mut config = self.config.clone();
        config.api.base_url = self.settings.base_url.trim().to_string();
        config.validate().map_err(|e| e.to_string())?;

        let client = AbsensiClient::new(&config.api.base_url, config.api.timeout(), Arc::new(self.store.clone()))
            .map_err(|e| e.to_string())?;

        config.save(&self.config_path).map_err(|e| e.to_string())?;

        let token = self.settings.token.trim();
        let stored = if token.is_empty() {
            self.store.remove(TOKEN_KEY).map(|_| ())
        } else {
            self.store.set(TOKEN_KEY, token)
        };
        stored.map_err(|e| e.to_string())?;

        tracing::info!("Connection settings saved to {:?}", self.config_path);
        self.has_token = !token.is_empty();
        self.config = config;
        self.client = client;
        Ok(())
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("Navigate", |ui| {
                    if ui.button("Absen").clicked() {
                        self.navigate(Route::Absen);
                        ui.close();
                    }
                    if ui.button("Data Absen").clicked() {
                        self.navigate(Route::DataAbsen);
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.log_open, "Activity Log").clicked() {
                        ui.close();
                    }
                });
                ui.menu_button("Settings", |ui| {
                    if ui.button("Connection...").clicked() {
                        self.open_settings();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    // API and token (left side)
                    let (color, token_text) = if self.has_token {
                        (colors::SUCCESS, "token set")
                    } else {
                        (colors::WARNING, "no token")
                    };
                    ui.colored_label(color, format!("API: {} ({})", self.config.api.base_url, token_text));

                    // Latest log entry (right side)
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(entry) = self.log_messages.last() {
                            ui.colored_label(
                                level_color(entry.level),
                                format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                            );
                        }
                    });
                });
            });
    }

    /// Render the activity log window.
    fn show_log_window(&mut self, ctx: &egui::Context) {
        if !self.log_open {
            return;
        }

        let mut open = true;
        let mut clear = false;
        egui::Window::new("Activity Log")
            .default_size([480.0, 260.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("{} entries", self.log_messages.len())).weak());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button(format!("{TRASH} Clear")).clicked() {
                            clear = true;
                        }
                    });
                });

                ui.add_space(5.0);

                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        // Constrain width to enable text wrapping
                        ui.set_width(ui.available_width());

                        if self.log_messages.is_empty() {
                            ui.label(RichText::new("No log entries").weak());
                        }
                        for entry in &self.log_messages {
                            let formatted = format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message);
                            ui.add(egui::Label::new(RichText::new(formatted).color(level_color(entry.level))).wrap());
                        }
                    });
            });

        if clear {
            self.clear_log();
        }
        if !open {
            self.log_open = false;
        }
    }

    /// Render connection settings dialog.
    fn show_settings_dialog(&mut self, ctx: &egui::Context) {
        if !self.settings.open {
            return;
        }

        let mut open = true;
        egui::Window::new("Connection Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("API URL:");
                        ui.add(egui::TextEdit::singleline(&mut self.settings.base_url).desired_width(300.0));
                        ui.end_row();

                        ui.label("Token:");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.settings.token)
                                .desired_width(300.0)
                                .password(true),
                        );
                        ui.end_row();
                    });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    let testing = self.settings.testing;
                    if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
                        self.test_api_connection();
                    }

                    ui.add_space(10.0);

                    if self.settings.testing {
                        ui.spinner();
                        ui.label("Testing...");
                    } else if let Some(result) = &self.settings.test_status {
                        match result {
                            Ok(status) => {
                                ui.colored_label(colors::SUCCESS, format!("Reachable ({})", status));
                            }
                            Err(e) => {
                                ui.colored_label(colors::ERROR, format!("Failed: {}", e));
                            }
                        }
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.settings.open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            match self.save_settings() {
                                Ok(()) => {
                                    self.settings.open = false;
                                    self.log(LogLevel::Success, "Connection settings saved");
                                }
                                Err(e) => {
                                    tracing::error!("Failed to save settings: {}", e);
                                    self.notify(Notification::error("Error", format!("Save failed: {}", e)));
                                }
                            }
                        }
                    });
                });
            });

        if !open {
            self.settings.open = false;
        }
    }

    /// Render the notification dialog.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(notification) = self.notification.clone() {
            let color = match notification.level {
                NoticeLevel::Success => colors::SUCCESS,
                NoticeLevel::Error => colors::ERROR,
            };
            egui::Window::new(notification.title.as_str())
                .id(egui::Id::new("notification_dialog"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(color, notification.message.as_str());
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.notification = None;
                    }
                });
        }
    }
}

fn level_color(level: LogLevel) -> Color32 {
    match level {
        LogLevel::Info => colors::NEUTRAL,
        LogLevel::Success => colors::SUCCESS,
        LogLevel::Error => colors::ERROR,
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_busy() {
            ctx.request_repaint();
        }

        if self.title_dirty {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.page_title()));
            self.title_dirty = false;
        }

        // Menu bar
        self.show_menu_bar(ctx);

        // Status bar
        self.show_status_bar(ctx);

        // Dialogs
        self.show_settings_dialog(ctx);
        self.show_log_window(ctx);
        self.show_dialogs(ctx);

        // Main content
        let mut next = None;
        let mut submit = false;
        egui::CentralPanel::default().show(ctx, |ui| match self.route.clone() {
            Route::EditAbsen(_) => {
                if let Some(screen) = self.edit.as_mut() {
                    match edit_absen::show(screen, ui) {
                        edit_absen::Action::None => {}
                        edit_absen::Action::GoBack => next = Some(Route::Absen),
                        edit_absen::Action::Submit => submit = true,
                    }
                }
            }
            route => {
                next = list_placeholder::show(ui, &route, &mut self.open_id_input);
            }
        });

        if submit {
            self.submit();
        }
        if let Some(route) = next {
            self.navigate(route);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::error::AppError;
    use crate::screen::{LOAD_FAILED, UPDATE_FAILED, UPDATE_SUCCEEDED};

    /// App on a current-thread runtime that is never driven, so spawned
    /// requests stay queued and results are fed in through `tx` by hand.
    fn app(start: Route) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let client = AbsensiClient::new(
            "http://127.0.0.1:9/api",
            Duration::from_secs(1),
            Arc::new(StaticToken(Some("secret".to_string()))),
        )
        .unwrap();
        let store = KeyValueStore::new(dir.path().join("storage.json"));
        let app = App::new(
            rt,
            client,
            store,
            AppConfig::default(),
            dir.path().join("config.toml"),
            start,
        );
        (app, dir)
    }

    fn pending_requests(app: &App) -> usize {
        app.rt.metrics().num_alive_tasks()
    }

    fn edit(id: &str) -> Route {
        Route::EditAbsen(id.to_string())
    }

    fn record(status: &str) -> AttendanceRecord {
        AttendanceRecord {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    /// Restart the active screen's load and deliver `result` for it.
    fn deliver_load(app: &mut App, result: Result<AttendanceRecord>) {
        let screen = app.edit.as_mut().unwrap();
        let generation = screen.begin_load();
        let id = screen.id().to_string();
        app.tx.send(UiMessage::RecordLoaded { id, generation, result }).unwrap();
        app.poll_async_results();
    }

    #[test]
    fn test_start_route_starts_one_fetch() {
        let (app, _dir) = app(edit("1"));
        assert_eq!(app.route, edit("1"));
        assert!(app.edit.as_ref().unwrap().is_loading());
        assert_eq!(pending_requests(&app), 1);
    }

    #[test]
    fn test_same_record_does_not_refetch() {
        let (mut app, _dir) = app(Route::Absen);
        assert!(app.edit.is_none());
        assert_eq!(pending_requests(&app), 0);

        app.navigate(edit("1"));
        app.navigate(edit("1"));
        assert_eq!(pending_requests(&app), 1);

        // Edits survive a repeated navigation to the same record.
        deliver_load(&mut app, Ok(record("izin")));
        app.edit.as_mut().unwrap().change(crate::models::Field::Keterangan, "rapat");
        app.navigate(edit("1"));
        assert_eq!(app.edit.as_ref().unwrap().form().keterangan, "rapat");
        assert_eq!(pending_requests(&app), 1);
    }

    #[test]
    fn test_other_record_replaces_screen() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Ok(record("izin")));

        app.navigate(edit("2"));
        let screen = app.edit.as_ref().unwrap();
        assert_eq!(screen.id(), "2");
        assert!(screen.is_loading());
        assert_eq!(screen.form().status, "hadir");
        assert_eq!(pending_requests(&app), 2);
    }

    #[test]
    fn test_list_routes_drop_the_screen() {
        let (mut app, _dir) = app(edit("1"));
        app.navigate(Route::DataAbsen);
        assert!(app.edit.is_none());

        // Coming back to the same id starts over.
        app.navigate(edit("1"));
        assert!(app.edit.as_ref().unwrap().is_loading());
        assert_eq!(pending_requests(&app), 2);
    }

    #[test]
    fn test_load_result_fills_form() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Ok(record("cuti")));

        let screen = app.edit.as_ref().unwrap();
        assert!(!screen.is_loading());
        assert_eq!(screen.form().status, "cuti");
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_load_failure_notifies() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Err(AppError::decode("bad")));

        assert_eq!(app.notification, Some(Notification::error("Error", LOAD_FAILED)));
        assert_eq!(app.edit.as_ref().unwrap().form().status, "hadir");
    }

    #[test]
    fn test_load_result_after_leaving_is_dropped() {
        let (mut app, _dir) = app(edit("1"));
        let generation = app.edit.as_mut().unwrap().begin_load();

        app.navigate(Route::Absen);
        app.tx
            .send(UiMessage::RecordLoaded {
                id: "1".to_string(),
                generation,
                result: Err(AppError::decode("late")),
            })
            .unwrap();
        app.poll_async_results();

        assert_eq!(app.route, Route::Absen);
        assert!(app.edit.is_none());
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_load_result_for_previous_record_is_dropped() {
        let (mut app, _dir) = app(edit("1"));
        let generation = app.edit.as_mut().unwrap().begin_load();

        app.navigate(edit("2"));
        app.tx
            .send(UiMessage::RecordLoaded {
                id: "1".to_string(),
                generation,
                result: Ok(record("libur")),
            })
            .unwrap();
        app.poll_async_results();

        let screen = app.edit.as_ref().unwrap();
        assert_eq!(screen.id(), "2");
        assert!(screen.is_loading());
        assert_eq!(screen.form().status, "hadir");
    }

    #[test]
    fn test_update_result_after_leaving_is_dropped() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Ok(record("izin")));
        let (generation, _) = app.edit.as_mut().unwrap().begin_submit().unwrap();

        app.navigate(edit("2"));
        app.tx
            .send(UiMessage::RecordUpdated {
                id: "1".to_string(),
                generation,
                result: Ok(()),
            })
            .unwrap();
        app.poll_async_results();

        assert_eq!(app.route, edit("2"));
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_update_success_notifies_once_and_goes_to_list() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Ok(record("izin")));
        let (generation, _) = app.edit.as_mut().unwrap().begin_submit().unwrap();

        for _ in 0..2 {
            app.tx
                .send(UiMessage::RecordUpdated {
                    id: "1".to_string(),
                    generation,
                    result: Ok(()),
                })
                .unwrap();
        }
        app.poll_async_results();

        assert_eq!(app.route, Route::DataAbsen);
        assert!(app.edit.is_none());
        assert_eq!(app.notification, Some(Notification::success("Berhasil", UPDATE_SUCCEEDED)));
        let successes = app
            .log_messages
            .iter()
            .filter(|entry| matches!(entry.level, LogLevel::Success))
            .count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn test_update_failure_stays_with_form() {
        let (mut app, _dir) = app(edit("1"));
        deliver_load(&mut app, Ok(record("izin")));
        let screen = app.edit.as_mut().unwrap();
        screen.change(crate::models::Field::JamPulang, "17:00");
        let before = screen.form().clone();
        let (generation, _) = screen.begin_submit().unwrap();

        app.tx
            .send(UiMessage::RecordUpdated {
                id: "1".to_string(),
                generation,
                result: Err(AppError::Status {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    body: serde_json::json!({ "message": "Validasi gagal" }),
                }),
            })
            .unwrap();
        app.poll_async_results();

        assert_eq!(app.route, edit("1"));
        assert_eq!(app.notification, Some(Notification::error("Gagal", UPDATE_FAILED)));
        let screen = app.edit.as_ref().unwrap();
        assert_eq!(screen.form(), &before);
        assert!(!screen.is_submitting());
    }

    #[test]
    fn test_activity_log_keeps_last_hundred() {
        let (mut app, _dir) = app(Route::Absen);
        for i in 0..150 {
            app.log(LogLevel::Info, format!("entry {i}"));
        }
        assert_eq!(app.log_messages.len(), 100);
        assert_eq!(app.log_messages.last().unwrap().message, "entry 149");

        app.clear_log();
        assert!(app.log_messages.is_empty());
    }
}
