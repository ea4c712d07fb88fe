//! Transient notifications (toasts) at the bottom of the window.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::AppSettings;
use crate::constants::NOTIFICATION_SECONDS;
use crate::i18n::{Text, tr};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Error,
}

/// Message shown to the user for a few seconds
#[derive(Message, Debug, Clone, PartialEq)]
pub struct Notify {
    pub message: String,
    pub kind: NotifyKind,
    /// File the toast offers to open
    pub path: Option<PathBuf>,
}

impl Notify {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotifyKind::Info,
            path: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotifyKind::Error,
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

struct Toast {
    notify: Notify,
    remaining: f32,
}

/// Visible toasts, oldest first
#[derive(Resource, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, notify: Notify) {
        self.items.push(Toast {
            notify,
            remaining: NOTIFICATION_SECONDS,
        });
    }

    /// Age all toasts by `seconds` and drop expired ones
    pub fn tick(&mut self, seconds: f32) {
        for toast in &mut self.items {
            toast.remaining -= seconds;
        }
        self.items.retain(|toast| toast.remaining > 0.0);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Collect new notifications and expire old ones
pub fn collect_notifications(mut events: MessageReader<Notify>, time: Res<Time>, mut toasts: ResMut<Toasts>) {
    toasts.tick(time.delta_secs());
    for event in events.read() {
        toasts.push(event.clone());
    }
}

pub fn toasts_ui(mut contexts: EguiContexts, toasts: Res<Toasts>, settings: Res<AppSettings>) -> Result {
    if toasts.is_empty() {
        return Ok(());
    }
    let locale = settings.locale();

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .order(egui::Order::Foreground)
        .show(contexts.ctx_mut()?, |ui| {
            for toast in &toasts.items {
                egui::Frame::new()
                    .fill(theme::ui::TOAST_BACKGROUND)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let color = match toast.notify.kind {
                                NotifyKind::Info => theme::ui::SUCCESS_TEXT,
                                NotifyKind::Error => theme::ui::ERROR_TEXT,
                            };
                            ui.colored_label(color, &toast.notify.message);

                            if let Some(path) = &toast.notify.path
                                && ui.button(tr(locale, Text::Open)).clicked()
                                && let Err(e) = open::that(path)
                            {
                                warn!("Could not open {:?}: {}", path, e);
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });
    Ok(())
}
