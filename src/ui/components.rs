//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Ui};

use crate::models::{AppointmentStatus, DoctorStatus, Priority, QueueStatus};

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const INFO: Color32 = Color32::from_rgb(100, 150, 230);
    pub const PRIMARY: Color32 = Color32::from_rgb(60, 110, 200);
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Plain button with a minimum height so toolbars line up.
pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(text).min_size(egui::vec2(80.0, 28.0)))
}

pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    styled_button(ui, &format!("{icon} {text}"))
}

/// Filled button for the main action of a toolbar or dialog.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(
        egui::Button::new(RichText::new(format!("{icon} {text}")).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small icon button used in table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0)).frame(false))
        .on_hover_text(tooltip)
}

pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Framed section with a bold title, used for the dashboard columns.
pub fn section<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui)
        })
        .inner
}

/// Render a stat card with title, value, and subtitle.
pub fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}

pub fn priority_color(priority: Priority) -> Color32 {
    match priority {
        Priority::Urgent => colors::ERROR,
        Priority::Normal => colors::NEUTRAL,
    }
}

pub fn queue_status_color(status: QueueStatus) -> Color32 {
    match status {
        QueueStatus::Waiting => colors::WARNING,
        QueueStatus::WithDoctor => colors::INFO,
        QueueStatus::Completed => colors::SUCCESS,
    }
}

pub fn doctor_status_color(status: DoctorStatus) -> Color32 {
    match status {
        DoctorStatus::Available => colors::SUCCESS,
        DoctorStatus::Busy => colors::WARNING,
        DoctorStatus::OffDuty => colors::NEUTRAL,
    }
}

pub fn appointment_status_color(status: AppointmentStatus) -> Color32 {
    match status {
        AppointmentStatus::Booked => colors::INFO,
        AppointmentStatus::Completed => colors::SUCCESS,
        AppointmentStatus::Canceled => colors::ERROR,
    }
}

/// Colored status text.
pub fn badge(ui: &mut Ui, text: &str, color: Color32) -> Response {
    ui.label(RichText::new(text).color(color).strong())
}
