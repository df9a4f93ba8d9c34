// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod backlog;
mod config;
mod models;
mod steam_api;
mod thumbs;

use config::Config;
use eframe::egui;
use steam_api::{BacklogProgress, FriendProgress};
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([700.0, 650.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Steam Backlog Checker",
        options,
        Box::new(|_cc| Ok(Box::new(BacklogCheckerApp::new()))),
    )
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Fetching { current: usize, total: usize },
    Displaying,
}

impl AppState {
    fn is_busy(&self) -> bool {
        matches!(self, AppState::Fetching { .. })
    }

    fn progress(&self) -> f32 {
        match self {
            AppState::Fetching { current, total } if *total > 0 => {
                *current as f32 / *total as f32
            }
            _ => 0.0,
        }
    }
}

/// One rendered result row. The texture handle keeps the cover alive; the
/// whole set is dropped when a new check starts.
struct DisplayRow {
    texture: egui::TextureHandle,
    label: String,
}

/// State of the friend-selection window while it is open.
struct FriendWindow {
    status: String,
    /// name -> steamid; duplicate display names collapse, last one wins
    by_name: BTreeMap<String, String>,
    receiver: Option<Receiver<FriendProgress>>,
}

struct BacklogCheckerApp {
    config: Config,
    steam_id_input: String,
    /// The id typed for the last check; the friend list is always this
    /// user's, even while viewing a friend's backlog.
    checked_steam_id: String,
    viewing: String,
    state: AppState,
    status: String,
    receiver: Option<Receiver<BacklogProgress>>,
    rows: Vec<DisplayRow>,
    empty_message: Option<String>,
    can_browse_friends: bool,
    error_modal: Option<String>,
    friend_window: Option<FriendWindow>,
}

impl BacklogCheckerApp {
    fn new() -> Self {
        let config = Config::load();
        let status = if config.is_valid() {
            "Ready".to_string()
        } else {
            "Set steam_web_api_key in config.toml".to_string()
        };

        Self {
            config,
            steam_id_input: String::new(),
            checked_steam_id: String::new(),
            viewing: String::new(),
            state: AppState::Idle,
            status,
            receiver: None,
            rows: Vec::new(),
            empty_message: None,
            can_browse_friends: false,
            error_modal: None,
            friend_window: None,
        }
    }

    fn on_check(&mut self) {
        let steam_id = self.steam_id_input.trim().to_string();
        if steam_id.is_empty() {
            self.error_modal = Some("Please enter your 64-bit SteamID.".to_string());
            return;
        }
        if !self.config.is_valid() {
            self.error_modal = Some("Please set steam_web_api_key in config.toml.".to_string());
            return;
        }

        self.viewing = "You".to_string();
        self.checked_steam_id = steam_id.clone();
        self.start_check(steam_id);
    }

    fn start_check(&mut self, steam_id: String) {
        // Prior results disappear before the worker starts
        self.rows.clear();
        self.empty_message = None;
        self.can_browse_friends = false;
        self.state = AppState::Fetching { current: 0, total: 0 };
        self.status = "Fetching library...".to_string();

        let steam_key = self.config.steam_web_api_key.clone();
        let (tx, rx): (Sender<BacklogProgress>, Receiver<BacklogProgress>) = channel();
        // A check started while one is in flight simply replaces the
        // receiver; the superseded worker runs to completion unobserved.
        self.receiver = Some(rx);

        thread::spawn(move || {
            if let Err(e) = steam_api::fetch_backlog_with_progress(tx.clone(), steam_key, steam_id)
            {
                let _ = tx.send(BacklogProgress::Error(e.to_string()));
            }
        });
    }

    fn open_friend_window(&mut self) {
        let (tx, rx): (Sender<FriendProgress>, Receiver<FriendProgress>) = channel();
        self.friend_window = Some(FriendWindow {
            status: "Loading friend list...".to_string(),
            by_name: BTreeMap::new(),
            receiver: Some(rx),
        });

        let steam_key = self.config.steam_web_api_key.clone();
        let steam_id = self.checked_steam_id.clone();

        thread::spawn(move || {
            if let Err(e) = steam_api::fetch_friends_with_progress(tx.clone(), steam_key, steam_id)
            {
                let _ = tx.send(FriendProgress::Error(e.to_string()));
            }
        });
    }

    fn check_progress(&mut self, ctx: &egui::Context) {
        let rx = match self.receiver.take() {
            Some(rx) => rx,
            None => return,
        };

        while let Ok(progress) = rx.try_recv() {
            match progress {
                BacklogProgress::Fetching => {
                    self.status = "Fetching library...".to_string();
                }
                BacklogProgress::LoadingThumbnails { current, total } => {
                    self.state = AppState::Fetching { current, total };
                    self.status = format!("Loading covers {} / {}...", current, total);
                }
                BacklogProgress::NoGames => {
                    self.empty_message =
                        Some("No games found or profile is private.".to_string());
                    self.status = "Done".to_string();
                    self.state = AppState::Displaying;
                    return;
                }
                BacklogProgress::Done { rows } => {
                    self.rows = rows
                        .into_iter()
                        .enumerate()
                        .map(|(i, row)| {
                            let size = [row.thumb.width as usize, row.thumb.height as usize];
                            let color =
                                egui::ColorImage::from_rgba_unmultiplied(size, &row.thumb.rgba);
                            let texture = ctx.load_texture(
                                format!("cover_{}_{}", i, row.entry.appid),
                                color,
                                egui::TextureOptions::LINEAR,
                            );
                            DisplayRow {
                                texture,
                                label: format!("{} - {} hrs", row.entry.name, row.entry.hours),
                            }
                        })
                        .collect();

                    if self.rows.is_empty() {
                        self.empty_message =
                            Some("No games under the backlog threshold.".to_string());
                    }
                    self.status = format!("{} backlog games", self.rows.len());
                    self.can_browse_friends = true;
                    self.state = AppState::Displaying;
                    return;
                }
                BacklogProgress::Error(e) => {
                    self.error_modal = Some(format!("Failed to fetch games:\n{}", e));
                    self.status = "Error".to_string();
                    self.state = AppState::Idle;
                    return;
                }
            }
        }

        self.receiver = Some(rx);
    }

    fn check_friend_progress(&mut self) {
        let Some(window) = self.friend_window.as_mut() else {
            return;
        };
        let Some(rx) = window.receiver.take() else {
            return;
        };

        while let Ok(progress) = rx.try_recv() {
            match progress {
                FriendProgress::NoFriends => {
                    window.status = "No friends found or list is private.".to_string();
                    return;
                }
                FriendProgress::Done { friends } => {
                    window.by_name = friends
                        .into_iter()
                        .map(|f| (f.personaname, f.steamid))
                        .collect();
                    window.status.clear();
                    return;
                }
                FriendProgress::Error(e) => {
                    window.status = format!("Error: {}", e);
                    return;
                }
            }
        }

        window.receiver = Some(rx);
    }

    fn render_friend_window(&mut self, ctx: &egui::Context) {
        let Some(window) = self.friend_window.as_ref() else {
            return;
        };

        let mut open = true;
        let mut selected: Option<(String, String)> = None;

        egui::Window::new("Select a Friend")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([300.0, 400.0])
            .show(ctx, |ui| {
                if !window.status.is_empty() {
                    if window.receiver.is_some() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(&window.status);
                        });
                    } else {
                        ui.label(&window.status);
                    }
                }

                egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    for (name, steamid) in &window.by_name {
                        if ui.selectable_label(false, name).clicked() {
                            selected = Some((name.clone(), steamid.clone()));
                        }
                    }
                });
            });

        if let Some((name, steamid)) = selected {
            self.friend_window = None;
            self.viewing = name;
            self.start_check(steamid);
        } else if !open {
            self.friend_window = None;
        }
    }

    fn render_error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error_modal.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(message);
                ui.add_space(16.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.error_modal = None;
        }
    }
}

impl eframe::App for BacklogCheckerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_progress(ctx);
        self.check_friend_progress();

        let friends_loading = self
            .friend_window
            .as_ref()
            .map(|w| w.receiver.is_some())
            .unwrap_or(false);
        if self.state.is_busy() || friends_loading {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label("Enter your 64-bit SteamID:");
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.steam_id_input)
                        .hint_text("76561197960287930")
                        .desired_width(240.0),
                );

                if ui.button("Check My Games").clicked() {
                    self.on_check();
                }

                if ui
                    .add_enabled(self.can_browse_friends, egui::Button::new("View Friends"))
                    .clicked()
                {
                    self.open_friend_window();
                }
            });

            if !self.viewing.is_empty() {
                ui.label(format!("Viewing: {}", self.viewing));
            }

            ui.horizontal(|ui| {
                if self.state.is_busy() {
                    ui.spinner();
                    ui.add(
                        egui::ProgressBar::new(self.state.progress())
                            .text(&self.status)
                            .animate(true),
                    );
                } else {
                    ui.label(&self.status);
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.empty_message {
                ui.label(message);
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for row in &self.rows {
                        ui.horizontal(|ui| {
                            ui.image(&row.texture);
                            ui.add(egui::Label::new(&row.label).wrap());
                        });
                        ui.add_space(5.0);
                    }
                });
        });

        self.render_friend_window(ctx);
        self.render_error_modal(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_busy() {
        assert!(!AppState::Idle.is_busy());
        assert!(!AppState::Displaying.is_busy());
        assert!(AppState::Fetching { current: 0, total: 0 }.is_busy());
    }

    #[test]
    fn test_app_state_progress() {
        assert_eq!(AppState::Fetching { current: 0, total: 0 }.progress(), 0.0);
        assert_eq!(AppState::Fetching { current: 2, total: 4 }.progress(), 0.5);
        assert_eq!(AppState::Idle.progress(), 0.0);
    }

    #[test]
    fn test_duplicate_friend_names_collapse_last_wins() {
        // The selection map is keyed by display name; two friends with the
        // same name leave only the later id selectable
        let friends = vec![
            models::Friend { steamid: "100".into(), personaname: "Sam".into() },
            models::Friend { steamid: "200".into(), personaname: "Sam".into() },
        ];
        let by_name: BTreeMap<String, String> = friends
            .into_iter()
            .map(|f| (f.personaname, f.steamid))
            .collect();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name["Sam"], "200");
    }

    #[test]
    fn test_friend_names_listed_sorted() {
        let friends = vec![
            models::Friend { steamid: "1".into(), personaname: "zoe".into() },
            models::Friend { steamid: "2".into(), personaname: "alice".into() },
            models::Friend { steamid: "3".into(), personaname: "mike".into() },
        ];
        let by_name: BTreeMap<String, String> = friends
            .into_iter()
            .map(|f| (f.personaname, f.steamid))
            .collect();
        let names: Vec<&String> = by_name.keys().collect();
        assert_eq!(names, vec!["alice", "mike", "zoe"]);
    }
}
