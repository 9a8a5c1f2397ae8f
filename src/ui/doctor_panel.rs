//! Doctor directory with filters and the doctor profile dialog.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FLOPPY_DISK, PENCIL, PLUS, TRASH};

use crate::models::{DoctorStatus, Gender};

use super::app::{App, ConfirmAction};
use super::components::{
    action_button, badge, danger_action_button, doctor_status_color, panel_header, primary_button_with_icon,
    styled_button, styled_button_with_icon,
};
use super::forms::{DoctorFilterForm, DoctorForm};

/// Show the doctors panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Manage Doctors");

    // Toolbar row 1: Action buttons
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Doctor").clicked() {
            app.doctor_form = DoctorForm::new_doctor();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_directory_now();
        }
    });

    ui.add_space(10.0);

    // Toolbar row 2: Filters
    let mut filter_changed = false;
    ui.horizontal(|ui| {
        ui.label("Specialization:");
        filter_changed |= ui
            .add(
                egui::TextEdit::singleline(&mut app.doctor_filter.specialization)
                    .desired_width(160.0)
                    .hint_text("e.g. Cardiology"),
            )
            .changed();

        ui.add_space(20.0);

        ui.label("Location:");
        filter_changed |= ui
            .add(
                egui::TextEdit::singleline(&mut app.doctor_filter.location)
                    .desired_width(140.0)
                    .hint_text("e.g. Room 101"),
            )
            .changed();

        ui.add_space(20.0);

        ui.label("Status:");
        let before = app.doctor_filter.status;
        egui::ComboBox::from_id_salt("doctor_status_filter")
            .width(120.0)
            .selected_text(app.doctor_filter.status.map(|s| s.as_str()).unwrap_or("All"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.doctor_filter.status, None, "All");
                for status in DoctorStatus::ALL {
                    ui.selectable_value(&mut app.doctor_filter.status, Some(status), status.as_str());
                }
            });
        filter_changed |= before != app.doctor_filter.status;

        if !app.doctor_filter.is_empty() {
            ui.add_space(10.0);
            if styled_button(ui, "Clear").clicked() {
                app.doctor_filter = DoctorFilterForm::default();
                filter_changed = true;
            }
        }

        if app.is_directory_busy() {
            ui.spinner();
        }
    });

    if filter_changed {
        app.schedule_directory_load();
    }

    ui.add_space(15.0);

    show_table(app, ui);

    if app.doctor_form.is_open {
        show_form_dialog(app, ui.ctx());
    }
}

fn show_table(app: &mut App, ui: &mut Ui) {
    if app.directory.is_empty() {
        let text = if app.directory_loading {
            "Loading doctors..."
        } else {
            "No doctors match the current filters."
        };
        ui.label(RichText::new(text).weak());
        return;
    }

    ui.label(format!("Showing {} doctors", app.directory.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("doctor_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("doctors_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Name");
                ui.strong("Specialization");
                ui.strong("Gender");
                ui.strong("Location");
                ui.strong("Status");
                ui.strong("Next Available");
                ui.strong("Actions");
                ui.end_row();

                for doctor in &app.directory {
                    ui.label(&doctor.name);
                    ui.label(&doctor.specialization);
                    ui.label(doctor.gender.as_str());
                    ui.label(&doctor.location);
                    badge(ui, doctor.status.as_str(), doctor_status_color(doctor.status));
                    ui.label(&doctor.next_available);

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.doctor_form = DoctorForm::edit(doctor);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.confirm = Some(ConfirmAction::DeleteDoctor {
                                id: doctor.id,
                                name: doctor.name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.doctor_form.is_editing() {
        "Edit Doctor"
    } else {
        "Add Doctor"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("doctor_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut app.doctor_form.name).desired_width(250.0));
                    ui.end_row();

                    ui.label("Specialization:");
                    ui.add(egui::TextEdit::singleline(&mut app.doctor_form.specialization).desired_width(250.0));
                    ui.end_row();

                    ui.label("Gender:");
                    egui::ComboBox::from_id_salt("doctor_form_gender")
                        .width(150.0)
                        .selected_text(app.doctor_form.gender.as_str())
                        .show_ui(ui, |ui| {
                            for gender in Gender::ALL {
                                ui.selectable_value(&mut app.doctor_form.gender, gender, gender.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("Location:");
                    ui.add(egui::TextEdit::singleline(&mut app.doctor_form.location).desired_width(250.0));
                    ui.end_row();

                    ui.label("Status:");
                    egui::ComboBox::from_id_salt("doctor_form_status")
                        .width(150.0)
                        .selected_text(app.doctor_form.status.as_str())
                        .show_ui(ui, |ui| {
                            for status in DoctorStatus::ALL {
                                ui.selectable_value(&mut app.doctor_form.status, status, status.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("Next Available:");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.doctor_form.next_available)
                            .desired_width(150.0)
                            .hint_text("e.g. 2:30 PM"),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.doctor_form.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_with_icon(ui, FLOPPY_DISK, "Save").clicked() {
                        save_doctor(app);
                    }
                });
            });
        });
}

fn save_doctor(app: &mut App) {
    match app.doctor_form.to_payload() {
        Ok(payload) => {
            let id = app.doctor_form.id;
            app.log_info(format!("Saving doctor: {}", payload.name));
            app.save_doctor(id, payload);
        }
        Err(e) => app.error_message = Some(e.user_message()),
    }
}
