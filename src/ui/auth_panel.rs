//! Login and registration screens.

use eframe::egui::{self, Key, RichText, Ui};
use egui_phosphor::regular::{SIGN_IN, USER_PLUS};

use crate::models::auth::MIN_PASSWORD_LEN;

use super::app::App;
use super::components::{colors, primary_button_with_icon};

const FORM_WIDTH: f32 = 320.0;

/// Show the login screen.
///
/// Returns `true` if the user asked to create an account.
pub fn show_login(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_register = false;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("Clinic Front Desk").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Sign in to manage the queue and appointments").size(14.0).weak());
        ui.add_space(30.0);

        let form = &mut app.login_form;
        let mut submit = false;

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(FORM_WIDTH));
                ui.end_row();

                ui.label("Password:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(FORM_WIDTH),
                );
                submit |= response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                ui.end_row();
            });

        ui.add_space(10.0);
        if let Some(error) = &form.error {
            ui.colored_label(colors::ERROR, error);
            ui.add_space(10.0);
        }

        let submitting = form.is_submitting;
        ui.add_enabled_ui(!submitting, |ui| {
            submit |= primary_button_with_icon(ui, SIGN_IN, "Log In").clicked();
        });
        if submitting {
            ui.spinner();
        }

        if submit && !submitting {
            app.login();
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            ui.label("Don't have an account?");
            if ui.link("Register").clicked() {
                go_register = true;
            }
        });
    });

    go_register
}

/// Show the registration screen.
///
/// Returns `true` if the user went back to login.
pub fn show_register(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_login = false;

    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(RichText::new("Create Staff Account").size(32.0).strong());
        ui.add_space(30.0);

        let form = &mut app.register_form;
        let mut submit = false;

        egui::Grid::new("register_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Email:");
                ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(FORM_WIDTH));
                ui.end_row();

                ui.label("Password:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(FORM_WIDTH)
                        .hint_text(format!("At least {MIN_PASSWORD_LEN} characters")),
                );
                submit |= response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                ui.end_row();
            });

        ui.add_space(10.0);
        if let Some(error) = &form.error {
            ui.colored_label(colors::ERROR, error);
            ui.add_space(10.0);
        }
        if let Some(success) = &form.success {
            ui.colored_label(colors::SUCCESS, success);
            ui.add_space(10.0);
        }

        let busy = form.is_submitting || form.success.is_some();
        ui.add_enabled_ui(!busy, |ui| {
            submit |= primary_button_with_icon(ui, USER_PLUS, "Register").clicked();
        });
        if form.is_submitting {
            ui.spinner();
        }

        if submit && !busy {
            app.register();
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            ui.label("Already have an account?");
            if ui.link("Log in").clicked() {
                go_login = true;
            }
        });
    });

    go_login
}
