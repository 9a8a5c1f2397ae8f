//! Doctor status list and the per-doctor schedule dialog.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CALENDAR, X_CIRCLE};

use crate::models::Doctor;

use super::app::{App, ConfirmAction};
use super::components::{action_button, badge, danger_action_button, doctor_status_color, section, styled_button};

/// Show the doctor status section.
pub fn show(app: &mut App, ui: &mut Ui) {
    let mut open_schedule: Option<Doctor> = None;

    section(ui, "Doctor Status", |ui| {
        if app.doctors.is_empty() {
            let text = if app.doctors_loading {
                "Loading doctors..."
            } else {
                "No doctors on file."
            };
            ui.label(RichText::new(text).weak());
            return;
        }

        ScrollArea::vertical()
            .id_salt("doctor_status_scroll")
            .max_height(360.0)
            .show(ui, |ui| {
                egui::Grid::new("doctor_status_grid")
                    .num_columns(4)
                    .striped(true)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.strong("Doctor");
                        ui.strong("Status");
                        ui.strong("Next Available");
                        ui.strong("");
                        ui.end_row();

                        for doctor in &app.doctors {
                            ui.vertical(|ui| {
                                ui.label(&doctor.name);
                                ui.label(
                                    RichText::new(format!("{} / {}", doctor.specialization, doctor.location))
                                        .small()
                                        .weak(),
                                );
                            });
                            badge(ui, doctor.status.as_str(), doctor_status_color(doctor.status));
                            ui.label(&doctor.next_available);
                            if action_button(ui, CALENDAR, "View schedule").clicked() {
                                open_schedule = Some(doctor.clone());
                            }
                            ui.end_row();
                        }
                    });
            });
    });

    if let Some(doctor) = open_schedule {
        app.open_schedule(&doctor);
    }
}

/// Render the schedule dialog if one is open.
pub fn show_schedule_dialog(app: &mut App, ctx: &egui::Context) {
    let Some(view) = app.schedule.as_ref() else {
        return;
    };

    let title = format!("Schedule: {}", view.doctor.name);
    let mut open = true;
    let mut cancel: Option<ConfirmAction> = None;
    let mut close = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(RichText::new(&view.doctor.specialization).weak());
            ui.add_space(10.0);

            if view.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading schedule...");
                });
            } else if view.appointments.is_empty() {
                ui.label(RichText::new("No upcoming appointments.").weak());
            } else {
                ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    egui::Grid::new("schedule_grid")
                        .num_columns(4)
                        .striped(true)
                        .spacing([12.0, 8.0])
                        .show(ui, |ui| {
                            ui.strong("Date");
                            ui.strong("Time");
                            ui.strong("Patient");
                            ui.strong("");
                            ui.end_row();

                            for appointment in &view.appointments {
                                ui.label(appointment.date.format("%Y-%m-%d").to_string());
                                ui.label(&appointment.time);
                                ui.label(&appointment.patient_name);
                                if danger_action_button(ui, X_CIRCLE, "Cancel appointment").clicked() {
                                    cancel = Some(ConfirmAction::CancelAppointment {
                                        id: appointment.id,
                                        doctor_id: appointment.doctor_id,
                                        patient_name: appointment.patient_name.clone(),
                                    });
                                }
                                ui.end_row();
                            }
                        });
                });
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            if styled_button(ui, "Close").clicked() {
                close = true;
            }
        });

    if cancel.is_some() {
        app.confirm = cancel;
    }
    if close || !open {
        app.schedule = None;
    }
}
