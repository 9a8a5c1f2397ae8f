//! Appointment list with search, status changes, rescheduling and queue hand-off.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CALENDAR_PLUS, FLOPPY_DISK, PENCIL, QUEUE};

use crate::models::{Appointment, AppointmentStatus};
use crate::queue::{self, QueueOffer};

use super::app::App;
use super::components::{
    action_button, appointment_status_color, badge, panel_header, primary_button_with_icon, styled_button,
    styled_button_with_icon,
};
use super::forms::AppointmentForm;

enum RowAction {
    Status(Appointment, AppointmentStatus),
    Reschedule(Appointment),
    Queue(Appointment),
}

/// Show the appointments panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "All Appointments");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, CALENDAR_PLUS, "Schedule Appointment").clicked() {
            app.appointment_form = AppointmentForm::new_appointment(queue::today());
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_appointments_now();
        }
    });

    ui.add_space(10.0);

    let mut search_changed = false;
    ui.horizontal(|ui| {
        ui.label("Search:");
        search_changed = ui
            .add(
                egui::TextEdit::singleline(&mut app.appointment_search)
                    .desired_width(260.0)
                    .hint_text("Patient or doctor name..."),
            )
            .changed();

        if !app.appointment_search.is_empty() {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.appointment_search.clear();
                search_changed = true;
            }
        }

        if app.is_appointments_busy() {
            ui.spinner();
        }
    });

    if search_changed {
        app.schedule_appointments_load();
    }

    ui.add_space(15.0);

    if let Some(action) = show_table(app, ui) {
        match action {
            RowAction::Status(appointment, status) => app.update_appointment_status(&appointment, status),
            RowAction::Reschedule(appointment) => app.appointment_form = AppointmentForm::edit(&appointment),
            RowAction::Queue(appointment) => app.push_to_queue(&appointment),
        }
    }

    if app.appointment_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_table(app: &App, ui: &mut Ui) -> Option<RowAction> {
    if app.appointments.is_empty() {
        let text = if app.appointments_loading {
            "Loading appointments..."
        } else {
            "No appointments found."
        };
        ui.label(RichText::new(text).weak());
        return None;
    }

    let today = queue::today();
    let mut action = None;

    ui.label(format!("Showing {} appointments", app.appointments.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("appointment_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("appointments_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Time");
                ui.strong("Patient");
                ui.strong("Doctor");
                ui.strong("Status");
                ui.strong("Actions");
                ui.end_row();

                for appointment in &app.appointments {
                    let finalized = appointment.status.is_finalized();
                    let cell = |text: String| {
                        let text = RichText::new(text);
                        if finalized { text.strikethrough().weak() } else { text }
                    };

                    ui.label(cell(appointment.date.format("%Y-%m-%d").to_string()));
                    ui.label(cell(appointment.time.clone()));
                    ui.label(cell(appointment.patient_name.clone()));
                    ui.label(cell(doctor_name(app, appointment)));

                    if finalized {
                        badge(ui, appointment.status.as_str(), appointment_status_color(appointment.status));
                    } else {
                        egui::ComboBox::from_id_salt(("appointment_status", appointment.id))
                            .width(110.0)
                            .selected_text(appointment.status.as_str())
                            .show_ui(ui, |ui| {
                                for status in AppointmentStatus::ALL {
                                    let allowed =
                                        status == appointment.status || appointment.status.can_transition_to(status);
                                    ui.add_enabled_ui(allowed, |ui| {
                                        if ui.selectable_label(appointment.status == status, status.as_str()).clicked()
                                            && status != appointment.status
                                        {
                                            action = Some(RowAction::Status(appointment.clone(), status));
                                        }
                                    });
                                }
                            });
                    }

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        ui.add_enabled_ui(!finalized, |ui| {
                            if action_button(ui, PENCIL, "Reschedule").clicked() {
                                action = Some(RowAction::Reschedule(appointment.clone()));
                            }
                        });

                        match app.queued_appointments.offer_for(appointment, today) {
                            QueueOffer::Hidden => {}
                            QueueOffer::AlreadyQueued => {
                                ui.add_space(4.0);
                                ui.add_enabled(false, egui::Button::new(format!("{QUEUE} In Queue")));
                            }
                            QueueOffer::Available => {
                                ui.add_space(4.0);
                                let idle = app.queue_push_in_flight.is_none();
                                if ui
                                    .add_enabled(idle, egui::Button::new(format!("{QUEUE} Add to Queue")))
                                    .clicked()
                                {
                                    action = Some(RowAction::Queue(appointment.clone()));
                                }
                            }
                        }
                    });

                    ui.end_row();
                }
            });
    });

    action
}

fn doctor_name(app: &App, appointment: &Appointment) -> String {
    if !appointment.doctor_name.is_empty() {
        return appointment.doctor_name.clone();
    }
    app.doctors
        .iter()
        .find(|d| d.id == appointment.doctor_id)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| format!("#{}", appointment.doctor_id))
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.appointment_form.is_editing() {
        "Reschedule Appointment"
    } else {
        "Schedule Appointment"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("appointment_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Patient Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.appointment_form.patient_name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Doctor:");
                    let selected = app
                        .appointment_form
                        .doctor_id
                        .and_then(|id| app.doctors.iter().find(|d| d.id == id))
                        .map(|d| format!("{} ({})", d.name, d.specialization))
                        .unwrap_or_else(|| "Select a doctor...".to_string());
                    egui::ComboBox::from_id_salt("appointment_form_doctor")
                        .width(250.0)
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for doctor in &app.doctors {
                                ui.selectable_value(
                                    &mut app.appointment_form.doctor_id,
                                    Some(doctor.id),
                                    format!("{} ({})", doctor.name, doctor.specialization),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Date:");
                    ui.add(DatePickerButton::new(&mut app.appointment_form.date).id_salt("appointment_form_date"));
                    ui.end_row();

                    ui.label("Time:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.appointment_form.time)
                            .desired_width(80.0)
                            .hint_text("HH:MM"),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.appointment_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, FLOPPY_DISK, "Save").clicked() {
                        save_appointment(app);
                    }
                });
            });
        });
}

fn save_appointment(app: &mut App) {
    match app.appointment_form.submission() {
        Ok(submission) => {
            app.log_info(format!("Saving appointment for {}", app.appointment_form.patient_name.trim()));
            app.save_appointment(submission);
        }
        Err(e) => app.error_message = Some(e.user_message()),
    }
}
