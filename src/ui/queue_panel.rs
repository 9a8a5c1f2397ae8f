//! Live queue list and the add-to-queue dialog.

use chrono::Local;
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, PLUS, TRASH};

use crate::models::{Doctor, Priority, QueueEntry};
use crate::queue::QueueAction;

use super::app::{App, ConfirmAction};
use super::components::{
    action_button, badge, colors, danger_action_button, primary_button_with_icon, priority_color,
    queue_status_color, section, styled_button, styled_button_with_icon,
};
use super::forms::{PatientType, QueueForm};

/// Row action picked during rendering, applied once the list is drawn.
enum RowAction {
    Priority(QueueEntry, Priority),
    Assign(QueueEntry, Doctor),
    Complete(QueueEntry),
    Remove(QueueEntry),
}

/// Show the live queue section.
pub fn show(app: &mut App, ui: &mut Ui) {
    section(ui, "Live Queue", |ui| {
        ui.horizontal(|ui| {
            if primary_button_with_icon(ui, PLUS, "Add Patient").clicked() {
                app.queue_form = QueueForm::open();
            }
            ui.add_space(10.0);
            if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                app.load_queue_view();
            }
            if app.queue_loading {
                ui.spinner();
            }
        });

        ui.add_space(10.0);

        if app.queue.is_empty() {
            let text = if app.queue_loading {
                "Loading queue..."
            } else {
                "The queue is empty."
            };
            ui.label(RichText::new(text).weak());
        } else if let Some(action) = show_entries(app, ui) {
            apply(app, action);
        }
    });

    if app.queue_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_entries(app: &App, ui: &mut Ui) -> Option<RowAction> {
    let mut action = None;

    ScrollArea::vertical()
        .id_salt("queue_scroll")
        .max_height(360.0)
        .show(ui, |ui| {
            egui::Grid::new("queue_grid")
                .num_columns(6)
                .striped(true)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Patient");
                    ui.strong("Priority");
                    ui.strong("Status");
                    ui.strong("Arrival");
                    ui.strong("Doctor");
                    ui.strong("Actions");
                    ui.end_row();

                    for entry in &app.queue {
                        ui.label(&entry.patient_name);

                        if entry.status.allows(QueueAction::ChangePriority) {
                            egui::ComboBox::from_id_salt(("queue_priority", entry.id))
                                .width(80.0)
                                .selected_text(
                                    RichText::new(entry.priority.as_str()).color(priority_color(entry.priority)),
                                )
                                .show_ui(ui, |ui| {
                                    for priority in Priority::ALL {
                                        if ui.selectable_label(entry.priority == priority, priority.as_str()).clicked()
                                        {
                                            action = Some(RowAction::Priority(entry.clone(), priority));
                                        }
                                    }
                                });
                        } else {
                            badge(ui, entry.priority.as_str(), priority_color(entry.priority));
                        }

                        badge(ui, entry.status.as_str(), queue_status_color(entry.status));

                        ui.vertical(|ui| {
                            ui.label(&entry.arrival);
                            ui.label(RichText::new(&entry.est_wait).small().weak());
                        });

                        let doctor_name = entry
                            .doctor_id
                            .and_then(|id| app.doctors.iter().find(|d| d.id == id))
                            .map(|d| d.name.as_str())
                            .unwrap_or("-");
                        ui.label(doctor_name);

                        ui.horizontal(|ui| {
                            if entry.status.allows(QueueAction::AssignDoctor) {
                                assign_menu(ui, entry, &app.available_doctors, &mut action);
                            }
                            if entry.status.allows(QueueAction::MarkCompleted)
                                && action_button(ui, CHECK, "Mark completed").clicked()
                            {
                                action = Some(RowAction::Complete(entry.clone()));
                            }
                            if entry.status.allows(QueueAction::Remove)
                                && danger_action_button(ui, TRASH, "Remove from queue").clicked()
                            {
                                action = Some(RowAction::Remove(entry.clone()));
                            }
                        });

                        ui.end_row();
                    }
                });
        });

    action
}

fn assign_menu(ui: &mut Ui, entry: &QueueEntry, available: &[Doctor], action: &mut Option<RowAction>) {
    egui::ComboBox::from_id_salt(("queue_assign", entry.id))
        .width(130.0)
        .selected_text("Assign doctor")
        .show_ui(ui, |ui| {
            if available.is_empty() {
                ui.label(RichText::new("No doctors available").weak());
            }
            for doctor in available {
                let label = format!("{} ({})", doctor.name, doctor.specialization);
                if ui.selectable_label(false, label).clicked() {
                    *action = Some(RowAction::Assign(entry.clone(), doctor.clone()));
                }
            }
        });
}

fn apply(app: &mut App, action: RowAction) {
    match action {
        RowAction::Priority(entry, priority) => app.change_priority(&entry, priority),
        RowAction::Assign(entry, doctor) => app.assign_doctor(&entry, &doctor),
        RowAction::Complete(entry) => app.complete_queue_entry(&entry),
        RowAction::Remove(entry) => {
            app.confirm = Some(ConfirmAction::RemoveFromQueue {
                id: entry.id,
                patient_name: entry.patient_name,
            });
        }
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    egui::Window::new("Add Patient to Queue")
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("queue_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Patient Type:");
                    ui.horizontal(|ui| {
                        ui.radio_value(&mut app.queue_form.patient_type, PatientType::WalkIn, "Walk-in");
                        ui.radio_value(&mut app.queue_form.patient_type, PatientType::Appointment, "Appointment");
                    });
                    ui.end_row();

                    match app.queue_form.patient_type {
                        PatientType::WalkIn => {
                            ui.label("Patient Name:");
                            ui.add(
                                egui::TextEdit::singleline(&mut app.queue_form.walk_in_name)
                                    .desired_width(220.0)
                                    .hint_text("Full name"),
                            );
                        }
                        PatientType::Appointment => {
                            ui.label("Appointment:");
                            let selected = app
                                .queue_form
                                .selected_appointment
                                .and_then(|id| app.queue_candidates.iter().find(|a| a.id == id))
                                .map(|a| format!("{} ({})", a.patient_name, a.time))
                                .unwrap_or_else(|| "Select...".to_string());
                            egui::ComboBox::from_id_salt("queue_form_appointment")
                                .width(220.0)
                                .selected_text(selected)
                                .show_ui(ui, |ui| {
                                    if app.queue_candidates.is_empty() {
                                        ui.label(RichText::new("No appointments waiting today").weak());
                                    }
                                    for appointment in &app.queue_candidates {
                                        let label = format!(
                                            "{} ({} with {})",
                                            appointment.patient_name, appointment.time, appointment.doctor_name
                                        );
                                        ui.selectable_value(
                                            &mut app.queue_form.selected_appointment,
                                            Some(appointment.id),
                                            label,
                                        );
                                    }
                                });
                        }
                    }
                    ui.end_row();

                    ui.label("Priority:");
                    ui.horizontal(|ui| {
                        for priority in Priority::ALL {
                            ui.radio_value(&mut app.queue_form.priority, priority, priority.as_str());
                        }
                    });
                    ui.end_row();
                });

            if app.queue_form.priority == Priority::Urgent {
                ui.add_space(5.0);
                ui.colored_label(colors::WARNING, "Urgent patients are seen before everyone else.");
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.queue_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, PLUS, "Add to Queue").clicked() {
                        submit(app);
                    }
                });
            });
        });
}

fn submit(app: &mut App) {
    match app.queue_form.build(&app.queue_candidates, &Local::now()) {
        Ok(entry) => {
            app.queue_form.is_open = false;
            app.add_to_queue(entry);
        }
        Err(e) => app.error_message = Some(e.user_message()),
    }
}
