//! Dashboard tab: stats, live queue, doctor status and activity log.

use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use crate::models::DoctorStatus;
use crate::queue::QueueStats;

use super::app::{App, LogLevel};
use super::components::{colors, section, stat_card};
use super::{doctor_status, queue_panel};

/// Show the dashboard panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    let stats = QueueStats::of(&app.queue);
    let available = app
        .doctors
        .iter()
        .filter(|d| d.status == DoctorStatus::Available)
        .count();

    ui.horizontal_wrapped(|ui| {
        stat_card(ui, "Waiting", &stats.waiting.to_string(), "Patients in the queue");
        stat_card(ui, "With Doctor", &stats.with_doctor.to_string(), "Being seen now");
        stat_card(ui, "Urgent", &stats.urgent.to_string(), "Open urgent cases");
        stat_card(ui, "Completed", &stats.completed.to_string(), "Finished today");
        stat_card(
            ui,
            "Doctors Available",
            &format!("{} / {}", available, app.doctors.len()),
            "Ready for assignment",
        );
        stat_card(
            ui,
            "Expected Today",
            &app.queue_candidates.len().to_string(),
            "Booked, not yet queued",
        );
    });

    ui.add_space(15.0);

    ui.columns(2, |columns| {
        queue_panel::show(app, &mut columns[0]);
        doctor_status::show(app, &mut columns[1]);
    });

    ui.add_space(15.0);

    show_activity(app, ui);
}

fn show_activity(app: &App, ui: &mut Ui) {
    section(ui, "Recent Activity", |ui| {
        ui.set_min_width(ui.available_width());
        ScrollArea::vertical()
            .id_salt("activity_scroll")
            .max_height(150.0)
            .show(ui, |ui| {
                if app.log_messages.is_empty() {
                    ui.label(RichText::new("No recent activity").weak());
                    return;
                }
                for entry in app.log_messages.iter().rev() {
                    let color = match entry.level {
                        LogLevel::Info => Color32::GRAY,
                        LogLevel::Success => colors::SUCCESS,
                        LogLevel::Warning => colors::WARNING,
                        LogLevel::Error => colors::ERROR,
                    };

                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                .small()
                                .color(Color32::DARK_GRAY),
                        );
                        ui.label(RichText::new(&entry.message).color(color));
                    });
                }
            });
    });
}
