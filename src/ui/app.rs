//! Main application state and frame loop.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout, RichText};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::{AppError, Result};
use crate::models::{
    Appointment, AppointmentQuery, AppointmentStatus, AppointmentUpdate, Doctor, DoctorFilter, DoctorPayload,
    NewQueueEntry, Priority, QueueEntry, QueueUpdate,
};
use crate::queue::{self, QueuedAppointments};
use crate::session::Session;

use super::components::colors;
use super::forms::{
    AppointmentForm, AppointmentSubmission, DoctorFilterForm, DoctorForm, LoginForm, QueueForm, RegisterForm,
};
use super::{appointment_panel, auth_panel, dashboard, doctor_panel, doctor_status};

/// How long the registration confirmation stays up before returning to login.
const REGISTER_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Interval at which the frame loop wakes up to drain task results.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Maximum number of activity log entries kept.
const MAX_LOG_ENTRIES: usize = 100;

const QUEUE_ADD_FAILED: &str = "Could not add patient to the queue.";

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
}

/// Current dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Appointments,
    Doctors,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Dashboard, Panel::Appointments, Panel::Doctors];

    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Appointments => "All Appointments",
            Panel::Doctors => "Manage Doctors",
        }
    }
}

/// View whose background load failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    QueueView,
    Doctors,
    Directory(u64),
    Appointments(u64),
    Schedule,
}

impl LoadTarget {
    fn label(&self) -> &'static str {
        match self {
            LoadTarget::QueueView => "queue",
            LoadTarget::Doctors => "doctor status",
            LoadTarget::Directory(_) => "doctor directory",
            LoadTarget::Appointments(_) => "appointments",
            LoadTarget::Schedule => "doctor schedule",
        }
    }
}

/// Successful write, reported back to the UI thread.
#[derive(Debug, Clone)]
pub enum Mutation {
    QueueAdded(String),
    QueueUpdated,
    QueueRemoved,
    DoctorSaved(String),
    DoctorDeleted,
    AppointmentSaved,
    AppointmentStatusChanged(AppointmentStatus),
    AppointmentQueued { appointment_id: i32, patient_name: String },
    AppointmentCanceled { doctor_id: i32 },
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Auth
    LoggedIn,
    LoginFailed(String),
    Registered,
    RegisterFailed(String),
    ShowLogin,
    SessionExpired,

    // Data loading
    QueueViewLoaded {
        queue: Vec<QueueEntry>,
        available: Vec<Doctor>,
        todays: Vec<Appointment>,
    },
    DoctorsLoaded(Vec<Doctor>),
    DirectoryLoaded {
        generation: u64,
        doctors: Vec<Doctor>,
    },
    AppointmentsLoaded {
        generation: u64,
        appointments: Vec<Appointment>,
    },
    ScheduleLoaded {
        doctor_id: i32,
        appointments: Vec<Appointment>,
    },
    LoadFailed(LoadTarget, String),

    // Writes
    Mutated(Mutation),
    OperationFailed(String),
    QueuePushFailed {
        appointment_id: i32,
        message: String,
    },

    // Server settings
    ConnectionTested(std::result::Result<(), String>),
}

impl UiMessage {
    /// Results that only make sense while the dashboard is open.
    fn needs_dashboard(&self) -> bool {
        matches!(
            self,
            UiMessage::QueueViewLoaded { .. }
                | UiMessage::DoctorsLoaded(_)
                | UiMessage::DirectoryLoaded { .. }
                | UiMessage::AppointmentsLoaded { .. }
                | UiMessage::ScheduleLoaded { .. }
                | UiMessage::Mutated(_)
        )
    }
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Action waiting for the user's confirmation.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    RemoveFromQueue { id: i32, patient_name: String },
    DeleteDoctor { id: i32, name: String },
    CancelAppointment { id: i32, doctor_id: i32, patient_name: String },
}

impl ConfirmAction {
    fn title(&self) -> &'static str {
        match self {
            ConfirmAction::RemoveFromQueue { .. } => "Remove from Queue",
            ConfirmAction::DeleteDoctor { .. } => "Delete Doctor",
            ConfirmAction::CancelAppointment { .. } => "Cancel Appointment",
        }
    }

    fn message(&self) -> String {
        match self {
            ConfirmAction::RemoveFromQueue { patient_name, .. } => {
                format!("Are you sure you want to remove {patient_name} from the queue?")
            }
            ConfirmAction::DeleteDoctor { name, .. } => format!("Are you sure you want to delete {name}?"),
            ConfirmAction::CancelAppointment { patient_name, .. } => {
                format!("Are you sure you want to cancel the appointment for {patient_name}?")
            }
        }
    }

    fn confirm_label(&self) -> &'static str {
        match self {
            ConfirmAction::RemoveFromQueue { .. } => "Remove",
            ConfirmAction::DeleteDoctor { .. } => "Delete",
            ConfirmAction::CancelAppointment { .. } => "Cancel Appointment",
        }
    }
}

/// Open doctor schedule dialog.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
    pub is_loading: bool,
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub api: ApiClient,
    pub session: Session,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Configuration
    pub config: AppConfig,
    config_path: PathBuf,

    // Navigation
    pub screen: Screen,
    pub current_panel: Panel,

    // Cached data
    pub queue: Vec<QueueEntry>,
    pub available_doctors: Vec<Doctor>,
    pub queue_candidates: Vec<Appointment>,
    pub doctors: Vec<Doctor>,
    pub directory: Vec<Doctor>,
    pub appointments: Vec<Appointment>,
    pub queued_appointments: QueuedAppointments,
    pub queue_push_in_flight: Option<i32>,

    // Loading states
    pub queue_loading: bool,
    pub doctors_loading: bool,
    pub directory_loading: bool,
    pub appointments_loading: bool,

    // Forms
    pub login_form: LoginForm,
    pub register_form: RegisterForm,
    pub queue_form: QueueForm,
    pub doctor_form: DoctorForm,
    pub doctor_filter: DoctorFilterForm,
    pub appointment_form: AppointmentForm,
    pub appointment_search: String,
    pub schedule: Option<ScheduleView>,

    // Search-as-you-type
    directory_debounce: Debouncer,
    appointment_debounce: Debouncer,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Dialogs
    pub confirm: Option<ConfirmAction>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Server settings dialog
    pub server_dialog_open: bool,
    pub server_url_input: String,
    server_testing: bool,
    server_test_status: Option<std::result::Result<(), String>>,
}

impl App {
    pub fn new(
        api: ApiClient,
        config: AppConfig,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
        initial_error: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = api.session().clone();
        let debounce = Duration::from_millis(config.ui.search_debounce_ms);
        let screen = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };

        let mut app = Self {
            rt,
            api,
            session,
            tx,
            rx,
            login_form: LoginForm::with_email(&config.ui.default_email),
            server_url_input: config.api.base_url.clone(),
            config,
            config_path,
            screen,
            current_panel: Panel::default(),
            queue: Vec::new(),
            available_doctors: Vec::new(),
            queue_candidates: Vec::new(),
            doctors: Vec::new(),
            directory: Vec::new(),
            appointments: Vec::new(),
            queued_appointments: QueuedAppointments::default(),
            queue_push_in_flight: None,
            queue_loading: false,
            doctors_loading: false,
            directory_loading: false,
            appointments_loading: false,
            register_form: RegisterForm::default(),
            queue_form: QueueForm::default(),
            doctor_form: DoctorForm::default(),
            doctor_filter: DoctorFilterForm::default(),
            appointment_form: AppointmentForm::default(),
            appointment_search: String::new(),
            schedule: None,
            directory_debounce: Debouncer::new(debounce),
            appointment_debounce: Debouncer::new(debounce),
            log_messages: Vec::new(),
            confirm: None,
            error_message: initial_error,
            success_message: None,
            server_dialog_open: false,
            server_testing: false,
            server_test_status: None,
        };

        if app.screen == Screen::Dashboard {
            app.log_info("Session restored");
            app.refresh_all();
        }

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info | LogLevel::Success => info!("{}", message),
            LogLevel::Warning => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }

        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message,
            level,
        });

        if self.log_messages.len() > MAX_LOG_ENTRIES {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Switch dashboard tab, reloading the data it shows.
    pub fn open_panel(&mut self, panel: Panel) {
        if panel == self.current_panel {
            return;
        }
        self.current_panel = panel;
        match panel {
            Panel::Dashboard => {
                self.load_queue_view();
                self.load_doctors();
            }
            Panel::Appointments => {
                self.queued_appointments.clear();
                self.queued_appointments.observe(&self.queue);
                self.load_appointments_now();
                self.load_doctors();
            }
            Panel::Doctors => self.load_directory_now(),
        }
    }

    /// Reload every view after a write.
    pub fn refresh_all(&mut self) {
        self.load_queue_view();
        self.load_doctors();
        self.load_directory_now();
        self.load_appointments_now();
    }

    /// Return to the login screen and drop everything tied to the session.
    fn show_login(&mut self) {
        self.directory_debounce.invalidate();
        self.appointment_debounce.invalidate();

        self.screen = Screen::Login;
        self.current_panel = Panel::Dashboard;
        self.queue.clear();
        self.available_doctors.clear();
        self.queue_candidates.clear();
        self.doctors.clear();
        self.directory.clear();
        self.appointments.clear();
        self.queued_appointments.clear();
        self.queue_push_in_flight = None;
        self.queue_loading = false;
        self.doctors_loading = false;
        self.directory_loading = false;
        self.appointments_loading = false;
        self.queue_form.reset();
        self.doctor_form.reset();
        self.appointment_form.reset();
        self.schedule = None;
        self.confirm = None;

        let email = if self.login_form.email.is_empty() {
            self.config.ui.default_email.clone()
        } else {
            self.login_form.email.clone()
        };
        self.login_form = LoginForm::with_email(&email);
    }

    /// Send the dashboard back to login once the token is gone.
    fn guard_session(&mut self) {
        if self.screen == Screen::Dashboard && !self.session.is_authenticated() {
            warn!("Session token missing, returning to login");
            self.show_login();
        }
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub fn login(&mut self) {
        let credentials = self.login_form.credentials();
        if let Err(e) = credentials.validate_login() {
            self.login_form.error = Some(e.user_message());
            return;
        }

        self.login_form.error = None;
        self.login_form.is_submitting = true;
        info!("Logging in as {}", credentials.email);

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            match api.login(&credentials).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::LoggedIn);
                }
                Err(e) => {
                    warn!("Login failed: {}", e);
                    let _ = tx.send(UiMessage::LoginFailed(
                        "Invalid email or password. Please try again.".to_string(),
                    ));
                }
            }
        });
    }

    pub fn register(&mut self) {
        let credentials = self.register_form.credentials();
        if let Err(e) = credentials.validate_registration() {
            self.register_form.error = Some(e.user_message());
            return;
        }

        self.register_form.error = None;
        self.register_form.success = None;
        self.register_form.is_submitting = true;
        info!("Registering {}", credentials.email);

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            match api.register(&credentials).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::Registered);
                    tokio::time::sleep(REGISTER_REDIRECT_DELAY).await;
                    let _ = tx.send(UiMessage::ShowLogin);
                }
                Err(e) => {
                    warn!("Registration failed: {}", e);
                    let message = e.server_message().unwrap_or("Failed to create account.").to_string();
                    let _ = tx.send(UiMessage::RegisterFailed(message));
                }
            }
        });
    }

    pub fn logout(&mut self) {
        self.api.logout();
        self.log_info("Logged out");
        self.show_login();
    }

    // ------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------

    /// Load the queue together with the doctors and appointments it needs.
    pub fn load_queue_view(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let today = queue::today();
        self.queue_loading = true;

        self.rt.spawn(async move {
            let available = DoctorFilter::available();
            let todays = AppointmentQuery::on(today);
            let result = tokio::try_join!(
                api.get_queue(),
                api.get_doctors(&available),
                api.get_appointments(&todays),
            );
            match result {
                Ok((queue, available, todays)) => {
                    let _ = tx.send(UiMessage::QueueViewLoaded {
                        queue,
                        available,
                        todays,
                    });
                }
                Err(e) => report_load_failure(&tx, LoadTarget::QueueView, e),
            }
        });
    }

    /// Load every doctor, for the status list and the appointment form.
    pub fn load_doctors(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.doctors_loading = true;

        self.rt.spawn(async move {
            match api.get_doctors(&DoctorFilter::default()).await {
                Ok(doctors) => {
                    let _ = tx.send(UiMessage::DoctorsLoaded(doctors));
                }
                Err(e) => report_load_failure(&tx, LoadTarget::Doctors, e),
            }
        });
    }

    /// Reload the directory after the filter inputs settle.
    pub fn schedule_directory_load(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let filter = self.doctor_filter.to_filter();
        self.directory_debounce
            .schedule(self.rt.handle(), move |generation| fetch_directory(api, tx, filter, generation));
    }

    pub fn load_directory_now(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let filter = self.doctor_filter.to_filter();
        self.directory_loading = true;
        self.directory_debounce
            .fire_now(self.rt.handle(), move |generation| fetch_directory(api, tx, filter, generation));
    }

    /// Reload the appointment list after the search input settles.
    pub fn schedule_appointments_load(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let query = AppointmentQuery::search(&self.appointment_search);
        self.appointment_debounce
            .schedule(self.rt.handle(), move |generation| fetch_appointments(api, tx, query, generation));
    }

    pub fn load_appointments_now(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let query = AppointmentQuery::search(&self.appointment_search);
        self.appointments_loading = true;
        self.appointment_debounce
            .fire_now(self.rt.handle(), move |generation| fetch_appointments(api, tx, query, generation));
    }

    pub fn is_directory_busy(&self) -> bool {
        self.directory_loading || self.directory_debounce.is_pending()
    }

    pub fn is_appointments_busy(&self) -> bool {
        self.appointments_loading || self.appointment_debounce.is_pending()
    }

    /// Open the schedule dialog for a doctor and load it.
    pub fn open_schedule(&mut self, doctor: &Doctor) {
        self.schedule = Some(ScheduleView {
            doctor: doctor.clone(),
            appointments: Vec::new(),
            is_loading: true,
        });
        self.load_schedule(doctor.id);
    }

    pub fn load_schedule(&mut self, doctor_id: i32) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        if let Some(view) = self.schedule.as_mut() {
            view.is_loading = true;
        }

        self.rt.spawn(async move {
            match api.get_doctor_schedule(doctor_id).await {
                Ok(appointments) => {
                    let _ = tx.send(UiMessage::ScheduleLoaded {
                        doctor_id,
                        appointments,
                    });
                }
                Err(e) => report_load_failure(&tx, LoadTarget::Schedule, e),
            }
        });
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Spawn a write; success becomes `done`, failure an alert built by `alert`.
    fn spawn_mutation<F, Fut, A>(&self, done: Mutation, alert: A, task: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
        A: FnOnce(&AppError) -> String + Send + 'static,
    {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            match task(api).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::Mutated(done));
                }
                Err(e) => report_failure(&tx, e, alert),
            }
        });
    }

    pub fn add_to_queue(&mut self, entry: NewQueueEntry) {
        self.log_info(format!("Adding {} to the queue", entry.patient_name));
        let name = entry.patient_name.clone();
        self.spawn_mutation(
            Mutation::QueueAdded(name),
            alert_with_server_message(QUEUE_ADD_FAILED),
            move |api| async move { api.add_to_queue(&entry).await },
        );
    }

    pub fn update_queue_entry(&mut self, id: i32, update: QueueUpdate) {
        self.spawn_mutation(
            Mutation::QueueUpdated,
            alert_with_server_message("Could not update the queue entry."),
            move |api| async move { api.update_queue_entry(id, &update).await },
        );
    }

    pub fn assign_doctor(&mut self, entry: &QueueEntry, doctor: &Doctor) {
        self.log_info(format!("Assigning {} to {}", entry.patient_name, doctor.name));
        self.update_queue_entry(entry.id, queue::assign_doctor(doctor.id));
    }

    pub fn complete_queue_entry(&mut self, entry: &QueueEntry) {
        self.log_info(format!("Marking {} as completed", entry.patient_name));
        self.update_queue_entry(entry.id, queue::complete());
    }

    pub fn change_priority(&mut self, entry: &QueueEntry, priority: Priority) {
        if entry.priority != priority {
            self.update_queue_entry(entry.id, queue::change_priority(priority));
        }
    }

    pub fn remove_from_queue(&mut self, id: i32) {
        self.spawn_mutation(
            Mutation::QueueRemoved,
            alert_with_server_message("Could not remove patient from the queue."),
            move |api| async move { api.remove_from_queue(id).await },
        );
    }

    pub fn save_doctor(&mut self, id: Option<i32>, payload: DoctorPayload) {
        let name = payload.name.clone();
        let alert = |e: &AppError| {
            format!(
                "Failed to save doctor profile: {}",
                e.server_message().unwrap_or("Server error")
            )
        };
        match id {
            Some(id) => self.spawn_mutation(Mutation::DoctorSaved(name), alert, move |api| async move {
                api.update_doctor(id, &payload).await
            }),
            None => self.spawn_mutation(Mutation::DoctorSaved(name), alert, move |api| async move {
                api.create_doctor(&payload).await
            }),
        }
    }

    pub fn delete_doctor(&mut self, id: i32) {
        self.spawn_mutation(
            Mutation::DoctorDeleted,
            alert_with_server_message("Could not delete doctor."),
            move |api| async move { api.delete_doctor(id).await },
        );
    }

    pub fn save_appointment(&mut self, submission: AppointmentSubmission) {
        let alert = |e: &AppError| format!("Could not save appointment: {}", e.user_message());
        match submission {
            AppointmentSubmission::Create(data) => {
                self.spawn_mutation(Mutation::AppointmentSaved, alert, move |api| async move {
                    api.create_appointment(&data).await
                })
            }
            AppointmentSubmission::Reschedule(id, update) => {
                self.spawn_mutation(Mutation::AppointmentSaved, alert, move |api| async move {
                    api.update_appointment(id, &update).await
                })
            }
        }
    }

    pub fn update_appointment_status(&mut self, appointment: &Appointment, status: AppointmentStatus) {
        if !appointment.status.can_transition_to(status) {
            return;
        }
        self.log_info(format!(
            "Setting appointment for {} to {}",
            appointment.patient_name,
            status.as_str()
        ));
        let id = appointment.id;
        self.spawn_mutation(
            Mutation::AppointmentStatusChanged(status),
            alert_with_server_message("Could not update appointment status."),
            move |api| async move { api.update_appointment(id, &AppointmentUpdate::status(status)).await },
        );
    }

    /// Push one of today's booked appointments into the live queue.
    pub fn push_to_queue(&mut self, appointment: &Appointment) {
        if self.queued_appointments.contains(appointment.id) || self.queue_push_in_flight.is_some() {
            return;
        }
        let entry = queue::from_appointment(appointment, Priority::Normal);
        let appointment_id = appointment.id;
        let patient_name = appointment.patient_name.clone();
        self.queue_push_in_flight = Some(appointment_id);
        self.log_info(format!("Adding {} to the queue", patient_name));

        // The lock is released only by this push's own outcome.
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            match api.add_to_queue(&entry).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::Mutated(Mutation::AppointmentQueued {
                        appointment_id,
                        patient_name,
                    }));
                }
                Err(e) if e.is_unauthorized() => {
                    let _ = tx.send(UiMessage::SessionExpired);
                }
                Err(e) => {
                    let message = alert_with_server_message(QUEUE_ADD_FAILED)(&e);
                    error!("{} ({})", message, e);
                    let _ = tx.send(UiMessage::QueuePushFailed { appointment_id, message });
                }
            }
        });
    }

    pub fn cancel_scheduled(&mut self, id: i32, doctor_id: i32) {
        self.spawn_mutation(
            Mutation::AppointmentCanceled { doctor_id },
            alert_with_server_message("Could not cancel the appointment."),
            move |api| async move {
                api.update_appointment(id, &AppointmentUpdate::status(AppointmentStatus::Canceled))
                    .await
            },
        );
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            if msg.needs_dashboard() && self.screen != Screen::Dashboard {
                continue;
            }
            match msg {
                UiMessage::LoggedIn => {
                    self.login_form.is_submitting = false;
                    self.login_form.password.clear();
                    self.login_form.error = None;
                    self.screen = Screen::Dashboard;
                    self.current_panel = Panel::Dashboard;
                    self.log_success(format!("Logged in as {}", self.login_form.email.trim()));
                    self.refresh_all();
                }
                UiMessage::LoginFailed(message) => {
                    self.login_form.is_submitting = false;
                    self.login_form.error = Some(message);
                }
                UiMessage::Registered => {
                    self.register_form.is_submitting = false;
                    self.register_form.success =
                        Some("Account created successfully! Redirecting to login...".to_string());
                }
                UiMessage::RegisterFailed(message) => {
                    self.register_form.is_submitting = false;
                    self.register_form.error = Some(message);
                }
                UiMessage::ShowLogin => {
                    if self.screen == Screen::Register {
                        let email = self.register_form.email.trim().to_string();
                        self.register_form.reset();
                        self.login_form = LoginForm::with_email(&email);
                        self.screen = Screen::Login;
                    }
                }
                UiMessage::SessionExpired => {
                    if self.error_message.is_none() {
                        self.error_message = Some("Your session has expired. Please log in again.".to_string());
                    }
                    self.log_warning("Session expired");
                    self.show_login();
                }
                UiMessage::QueueViewLoaded {
                    mut queue,
                    available,
                    todays,
                } => {
                    queue::order_queue(&mut queue);
                    self.queued_appointments.observe(&queue);
                    self.queue_candidates = queue::eligible_appointments(&queue, &todays);
                    self.queue = queue;
                    self.available_doctors = available;
                    self.queue_loading = false;
                }
                UiMessage::DoctorsLoaded(doctors) => {
                    self.doctors = doctors;
                    self.doctors_loading = false;
                }
                UiMessage::DirectoryLoaded { generation, doctors } => {
                    if self.directory_debounce.is_current(generation) {
                        self.directory = doctors;
                        self.directory_loading = false;
                    }
                }
                UiMessage::AppointmentsLoaded {
                    generation,
                    appointments,
                } => {
                    if self.appointment_debounce.is_current(generation) {
                        self.appointments = appointments;
                        self.appointments_loading = false;
                    }
                }
                UiMessage::ScheduleLoaded {
                    doctor_id,
                    appointments,
                } => {
                    if let Some(view) = self.schedule.as_mut()
                        && view.doctor.id == doctor_id
                    {
                        view.appointments = appointments
                            .into_iter()
                            .filter(|a| !a.status.is_finalized())
                            .collect();
                        view.is_loading = false;
                    }
                }
                UiMessage::LoadFailed(target, message) => {
                    match target {
                        LoadTarget::QueueView => self.queue_loading = false,
                        LoadTarget::Doctors => self.doctors_loading = false,
                        LoadTarget::Directory(generation) => {
                            if self.directory_debounce.is_current(generation) {
                                self.directory_loading = false;
                            }
                        }
                        LoadTarget::Appointments(generation) => {
                            if self.appointment_debounce.is_current(generation) {
                                self.appointments_loading = false;
                            }
                        }
                        LoadTarget::Schedule => {
                            if let Some(view) = self.schedule.as_mut() {
                                view.is_loading = false;
                            }
                        }
                    }
                    self.log_error(format!("Failed to load {}: {}", target.label(), message));
                }
                UiMessage::Mutated(mutation) => self.on_mutation(mutation),
                UiMessage::OperationFailed(message) => {
                    self.error_message = Some(message.clone());
                    self.log_error(message);
                }
                UiMessage::QueuePushFailed {
                    appointment_id,
                    message,
                } => {
                    if self.queue_push_in_flight == Some(appointment_id) {
                        self.queue_push_in_flight = None;
                    }
                    self.error_message = Some(message.clone());
                    self.log_error(message);
                }
                UiMessage::ConnectionTested(result) => {
                    self.server_testing = false;
                    match &result {
                        Ok(()) => self.log_success("Server connection successful"),
                        Err(e) => self.log_error(format!("Server connection failed: {}", e)),
                    }
                    self.server_test_status = Some(result);
                }
            }
        }
    }

    fn on_mutation(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::QueueAdded(name) => {
                self.queue_form.reset();
                self.log_success(format!("{} added to the queue", name));
            }
            Mutation::QueueUpdated => self.log_success("Queue entry updated"),
            Mutation::QueueRemoved => self.log_success("Patient removed from the queue"),
            Mutation::DoctorSaved(name) => {
                self.doctor_form.reset();
                self.log_success(format!("Doctor '{}' saved", name));
            }
            Mutation::DoctorDeleted => self.log_success("Doctor deleted"),
            Mutation::AppointmentSaved => {
                self.appointment_form.reset();
                self.log_success("Appointment saved");
            }
            Mutation::AppointmentStatusChanged(status) => {
                self.log_success(format!("Appointment marked {}", status.as_str()));
            }
            Mutation::AppointmentQueued {
                appointment_id,
                patient_name,
            } => {
                self.queued_appointments.mark(appointment_id);
                self.queue_push_in_flight = None;
                self.log_success(format!("{} added to the queue", patient_name));
                self.success_message = Some(format!("{} has been added to the live queue.", patient_name));
            }
            Mutation::AppointmentCanceled { doctor_id } => {
                self.log_success("Appointment canceled");
                if self.schedule.as_ref().is_some_and(|view| view.doctor.id == doctor_id) {
                    self.load_schedule(doctor_id);
                }
            }
        }
        self.refresh_all();
    }

    // ------------------------------------------------------------------
    // Server settings
    // ------------------------------------------------------------------

    fn open_server_dialog(&mut self) {
        self.server_dialog_open = true;
        self.server_url_input = self.config.api.base_url.clone();
        self.server_test_status = None;
    }

    /// Check the URL typed in the server dialog without saving it.
    fn test_server_connection(&mut self) {
        let mut api_config = self.config.api.clone();
        api_config.base_url = self.server_url_input.trim().to_string();
        if api_config.base_url.is_empty() {
            self.server_test_status = Some(Err("URL is empty".to_string()));
            return;
        }

        let client = match ApiClient::new(&api_config, Session::in_memory()) {
            Ok(client) => client,
            Err(e) => {
                self.server_test_status = Some(Err(e.to_string()));
                return;
            }
        };

        self.server_testing = true;
        self.server_test_status = None;
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = match client.test_connection().await {
                Ok(true) => Ok(()),
                Ok(false) => Err("Server responded with an error".to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(UiMessage::ConnectionTested(result));
        });
    }

    /// Apply and persist the URL from the server dialog.
    fn save_server_config(&mut self) -> bool {
        let mut config = self.config.clone();
        config.api.base_url = self.server_url_input.trim().to_string();
        if let Err(e) = config.validate() {
            self.server_test_status = Some(Err(e.to_string()));
            return false;
        }

        match ApiClient::new(&config.api, self.session.clone()) {
            Ok(api) => self.api = api,
            Err(e) => {
                self.server_test_status = Some(Err(e.to_string()));
                return false;
            }
        }

        if let Err(e) = config.save(&self.config_path) {
            self.log_error(format!("Failed to save config: {}", e));
        }
        self.config = config;
        self.log_info(format!("API server set to {}", self.api.base_url()));

        if self.screen == Screen::Dashboard {
            self.refresh_all();
        }
        true
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Server Settings").clicked() {
                        self.open_server_dialog();
                        ui.close();
                    }
                    if self.screen == Screen::Dashboard {
                        if ui.button("Refresh").clicked() {
                            self.refresh_all();
                            ui.close();
                        }
                        ui.separator();
                        if ui.button("Log Out").clicked() {
                            self.logout();
                            ui.close();
                        }
                    }
                });
                if self.screen == Screen::Dashboard {
                    ui.menu_button("Activity", |ui| {
                        if ui.button("Clear Log").clicked() {
                            self.clear_log();
                            ui.close();
                        }
                    });
                }
            });
        });
    }

    /// Render tab strip.
    fn show_tabs(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for panel in Panel::ALL {
                    let text = RichText::new(panel.name()).size(15.0);
                    if ui.selectable_label(self.current_panel == panel, text).clicked() {
                        self.open_panel(panel);
                    }
                    ui.add_space(8.0);
                }
            });
            ui.add_space(4.0);
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = if self.session.is_authenticated() {
                        (colors::SUCCESS, "Signed in")
                    } else {
                        (colors::NEUTRAL, "Signed out")
                    };
                    ui.colored_label(color, text);
                    ui.separator();
                    ui.label(format!("Server: {}", self.api.base_url()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let busy = self.queue_loading
                            || self.doctors_loading
                            || self.is_directory_busy()
                            || self.is_appointments_busy();
                        if busy {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    });
                });
            });
    }

    /// Render server settings dialog.
    fn show_server_dialog(&mut self, ctx: &egui::Context) {
        if !self.server_dialog_open {
            return;
        }

        let mut open = true;
        egui::Window::new("Server Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(10.0);

                egui::Grid::new("server_grid")
                    .num_columns(2)
                    .spacing([20.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("API URL:");
                        ui.add(egui::TextEdit::singleline(&mut self.server_url_input).desired_width(280.0));
                        ui.end_row();
                    });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.server_testing, egui::Button::new("Test Connection"))
                        .clicked()
                    {
                        self.test_server_connection();
                    }

                    ui.add_space(10.0);

                    if self.server_testing {
                        ui.spinner();
                        ui.label("Testing...");
                    } else if let Some(result) = &self.server_test_status {
                        match result {
                            Ok(()) => {
                                ui.colored_label(colors::SUCCESS, "Connection successful!");
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
                        self.server_dialog_open = false;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() && self.save_server_config() {
                            self.server_dialog_open = false;
                        }
                    });
                });
            });

        if !open {
            self.server_dialog_open = false;
        }
    }

    /// Render modal dialogs (error, success, confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Confirmation dialog
        if let Some(action) = self.confirm.clone() {
            egui::Window::new(action.title())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(action.message());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Keep").clicked() {
                            self.confirm = None;
                        }
                        if ui
                            .button(RichText::new(action.confirm_label()).color(colors::ERROR))
                            .clicked()
                        {
                            self.confirm = None;
                            self.run_confirmed(action.clone());
                        }
                    });
                });
        }
    }

    /// Execute the confirmed operation.
    fn run_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::RemoveFromQueue { id, patient_name } => {
                self.log_info(format!("Removing {} from the queue", patient_name));
                self.remove_from_queue(id);
            }
            ConfirmAction::DeleteDoctor { id, name } => {
                self.log_info(format!("Deleting doctor: {}", name));
                self.delete_doctor(id);
            }
            ConfirmAction::CancelAppointment {
                id,
                doctor_id,
                patient_name,
            } => {
                self.log_info(format!("Canceling appointment for {}", patient_name));
                self.cancel_scheduled(id, doctor_id);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();
        self.guard_session();

        // Task results arrive without input events
        ctx.request_repaint_after(POLL_INTERVAL);

        self.show_menu_bar(ctx);
        self.show_server_dialog(ctx);

        match self.screen {
            Screen::Login => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if auth_panel::show_login(self, ui) {
                        self.register_form.reset();
                        self.screen = Screen::Register;
                    }
                });
            }
            Screen::Register => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if auth_panel::show_register(self, ui) {
                        self.screen = Screen::Login;
                    }
                });
            }
            Screen::Dashboard => {
                self.show_tabs(ctx);
                self.show_status_bar(ctx);

                egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
                    Panel::Dashboard => dashboard::show(self, ui),
                    Panel::Appointments => appointment_panel::show(self, ui),
                    Panel::Doctors => doctor_panel::show(self, ui),
                });

                doctor_status::show_schedule_dialog(self, ctx);
            }
        }

        // Modal dialogs (error, success, confirmation)
        self.show_dialogs(ctx);
    }
}

/// Fetch the directory for a filter, tagging the result with its generation.
async fn fetch_directory(
    api: ApiClient,
    tx: mpsc::UnboundedSender<UiMessage>,
    filter: DoctorFilter,
    generation: u64,
) {
    match api.get_doctors(&filter).await {
        Ok(doctors) => {
            let _ = tx.send(UiMessage::DirectoryLoaded { generation, doctors });
        }
        Err(e) => report_load_failure(&tx, LoadTarget::Directory(generation), e),
    }
}

async fn fetch_appointments(
    api: ApiClient,
    tx: mpsc::UnboundedSender<UiMessage>,
    query: AppointmentQuery,
    generation: u64,
) {
    match api.get_appointments(&query).await {
        Ok(appointments) => {
            let _ = tx.send(UiMessage::AppointmentsLoaded {
                generation,
                appointments,
            });
        }
        Err(e) => report_load_failure(&tx, LoadTarget::Appointments(generation), e),
    }
}

/// Route a failed write: expiry logs out, anything else becomes an alert.
fn report_failure<A>(tx: &mpsc::UnboundedSender<UiMessage>, err: AppError, alert: A)
where
    A: FnOnce(&AppError) -> String,
{
    if err.is_unauthorized() {
        let _ = tx.send(UiMessage::SessionExpired);
        return;
    }
    let message = alert(&err);
    error!("{} ({})", message, err);
    let _ = tx.send(UiMessage::OperationFailed(message));
}

/// Alert text: `base`, followed by the server's message when it sent one.
fn alert_with_server_message(base: &'static str) -> impl FnOnce(&AppError) -> String + Send + 'static {
    move |e: &AppError| match e.server_message() {
        Some(message) => format!("{base} {message}"),
        None => base.to_string(),
    }
}

/// Route a failed background load: expiry logs out, anything else is logged.
fn report_load_failure(tx: &mpsc::UnboundedSender<UiMessage>, target: LoadTarget, err: AppError) {
    if err.is_unauthorized() {
        let _ = tx.send(UiMessage::SessionExpired);
        return;
    }
    warn!("Failed to load {}: {}", target.label(), err);
    let _ = tx.send(UiMessage::LoadFailed(target, err.to_string()));
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use chrono::Utc;

    use super::*;
    use crate::config::ApiConfig;
    use crate::models::{DoctorStatus, Gender, QueueStatus};

    /// Backend that accepts connections and never answers, so every request
    /// the app spawns stays in flight for the length of a test.
    fn silent_backend() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").unwrap()
    }

    fn app_for(backend: &TcpListener, token: Option<&str>) -> App {
        let config = AppConfig {
            api: ApiConfig {
                base_url: format!("http://{}", backend.local_addr().unwrap()),
                timeout_secs: 30,
            },
            ..Default::default()
        };
        let session = Session::in_memory();
        if let Some(token) = token {
            session.begin(token.to_string());
        }
        let api = ApiClient::new(&config.api, session).unwrap();
        let rt = tokio::runtime::Runtime::new().unwrap();
        App::new(api, config, PathBuf::from("config.toml"), rt, None)
    }

    fn doctor(id: i32) -> Doctor {
        Doctor {
            id,
            name: format!("Doctor {id}"),
            specialization: "Cardiology".to_string(),
            gender: Gender::Female,
            location: "Room 101".to_string(),
            status: DoctorStatus::Available,
            next_available: "2:30 PM".to_string(),
        }
    }

    fn booked_today(id: i32, patient_name: &str) -> Appointment {
        Appointment {
            id,
            patient_name: patient_name.to_string(),
            doctor_id: 1,
            doctor_name: "Doctor 1".to_string(),
            date: queue::today(),
            time: "10:30".to_string(),
            status: AppointmentStatus::Booked,
        }
    }

    fn queued_from(id: i32, appointment_id: i32) -> QueueEntry {
        QueueEntry {
            id,
            patient_name: "Sam Lee".to_string(),
            priority: Priority::Normal,
            status: QueueStatus::Waiting,
            arrival: "10:30".to_string(),
            est_wait: "Scheduled".to_string(),
            created_at: Utc::now(),
            appointment_id: Some(appointment_id),
            doctor_id: None,
        }
    }

    #[test]
    fn test_starts_on_login_without_token() {
        let backend = silent_backend();
        let app = app_for(&backend, None);
        assert_eq!(app.screen, Screen::Login);

        let app = app_for(&backend, Some("t"));
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_session_expiry_shows_login_with_alert() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        app.queue = vec![queued_from(1, 5)];

        app.session.end();
        report_failure(&app.tx, AppError::Unauthorized, |_| "unused".to_string());
        app.poll_async_results();

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(
            app.error_message.as_deref(),
            Some("Your session has expired. Please log in again.")
        );
        assert!(app.queue.is_empty());
    }

    #[test]
    fn test_missing_token_sends_dashboard_to_login() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));

        app.session.end();
        app.guard_session();

        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_unrelated_failure_keeps_queue_push_lock() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        let appointment = booked_today(5, "Sam Lee");

        app.push_to_queue(&appointment);
        assert_eq!(app.queue_push_in_flight, Some(5));

        app.tx
            .send(UiMessage::OperationFailed("Could not update appointment status.".to_string()))
            .unwrap();
        app.poll_async_results();
        assert_eq!(app.queue_push_in_flight, Some(5));
        assert!(app.error_message.is_some());

        app.tx
            .send(UiMessage::QueuePushFailed {
                appointment_id: 5,
                message: QUEUE_ADD_FAILED.to_string(),
            })
            .unwrap();
        app.poll_async_results();
        assert_eq!(app.queue_push_in_flight, None);
        assert!(!app.queued_appointments.contains(5));
    }

    #[test]
    fn test_successful_push_marks_appointment_queued() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        app.queue_push_in_flight = Some(5);

        app.tx
            .send(UiMessage::Mutated(Mutation::AppointmentQueued {
                appointment_id: 5,
                patient_name: "Sam Lee".to_string(),
            }))
            .unwrap();
        app.poll_async_results();

        assert_eq!(app.queue_push_in_flight, None);
        assert!(app.queued_appointments.contains(5));
        assert_eq!(
            app.success_message.as_deref(),
            Some("Sam Lee has been added to the live queue.")
        );
    }

    #[test]
    fn test_failure_alert_carries_server_message() {
        let err = AppError::Server {
            status: 409,
            message: Some("Doctor still has booked appointments".to_string()),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        report_failure(&tx, err, alert_with_server_message("Could not delete doctor."));

        match rx.try_recv() {
            Ok(UiMessage::OperationFailed(message)) => {
                assert_eq!(message, "Could not delete doctor. Doctor still has booked appointments");
            }
            _ => panic!("expected an operation failure"),
        }
    }

    #[test]
    fn test_failure_alert_without_server_message() {
        let err = AppError::Server {
            status: 500,
            message: None,
        };
        let alert = alert_with_server_message("Could not cancel the appointment.");
        assert_eq!(alert(&err), "Could not cancel the appointment.");
    }

    #[test]
    fn test_mutation_refreshes_every_view() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        app.queue_loading = false;
        app.doctors_loading = false;
        app.directory_loading = false;
        app.appointments_loading = false;

        app.tx.send(UiMessage::Mutated(Mutation::QueueUpdated)).unwrap();
        app.poll_async_results();

        assert!(app.queue_loading);
        assert!(app.doctors_loading);
        assert!(app.directory_loading);
        assert!(app.appointments_loading);
    }

    #[test]
    fn test_superseded_results_are_dropped() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));

        let stale = app.directory_debounce.fire_now(app.rt.handle(), |_| async {});
        let fresh = app.directory_debounce.fire_now(app.rt.handle(), |_| async {});

        app.tx
            .send(UiMessage::DirectoryLoaded {
                generation: stale,
                doctors: vec![doctor(1)],
            })
            .unwrap();
        app.poll_async_results();
        assert!(app.directory.is_empty());

        app.tx
            .send(UiMessage::DirectoryLoaded {
                generation: fresh,
                doctors: vec![doctor(2)],
            })
            .unwrap();
        app.poll_async_results();
        assert_eq!(app.directory.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);

        let stale = app.appointment_debounce.fire_now(app.rt.handle(), |_| async {});
        let _fresh = app.appointment_debounce.fire_now(app.rt.handle(), |_| async {});
        app.tx
            .send(UiMessage::AppointmentsLoaded {
                generation: stale,
                appointments: vec![booked_today(1, "Sam Lee")],
            })
            .unwrap();
        app.poll_async_results();
        assert!(app.appointments.is_empty());
    }

    #[test]
    fn test_stale_load_failure_keeps_newer_load_busy() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));

        let stale = app.directory_debounce.fire_now(app.rt.handle(), |_| async {});
        let fresh = app.directory_debounce.fire_now(app.rt.handle(), |_| async {});
        app.directory_loading = true;

        app.tx
            .send(UiMessage::LoadFailed(LoadTarget::Directory(stale), "timed out".to_string()))
            .unwrap();
        app.poll_async_results();
        assert!(app.directory_loading);

        app.tx
            .send(UiMessage::LoadFailed(LoadTarget::Directory(fresh), "timed out".to_string()))
            .unwrap();
        app.poll_async_results();
        assert!(!app.directory_loading);
    }

    #[test]
    fn test_results_after_logout_are_dropped() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        let in_flight = app.directory_debounce.fire_now(app.rt.handle(), |_| async {});

        app.logout();
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.directory_debounce.is_current(in_flight));

        app.tx
            .send(UiMessage::QueueViewLoaded {
                queue: vec![queued_from(1, 5)],
                available: vec![doctor(1)],
                todays: vec![booked_today(5, "Sam Lee")],
            })
            .unwrap();
        app.tx.send(UiMessage::DoctorsLoaded(vec![doctor(1)])).unwrap();
        app.poll_async_results();

        assert!(app.queue.is_empty());
        assert!(app.available_doctors.is_empty());
        assert!(app.doctors.is_empty());
        assert!(!app.queued_appointments.contains(5));
    }

    #[test]
    fn test_entering_appointments_reseeds_queued_ids() {
        let backend = silent_backend();
        let mut app = app_for(&backend, Some("t"));
        app.queue = vec![queued_from(1, 3)];
        app.queued_appointments.mark(9);

        app.open_panel(Panel::Appointments);

        assert_eq!(app.current_panel, Panel::Appointments);
        assert!(app.queued_appointments.contains(3));
        assert!(!app.queued_appointments.contains(9));
    }
}
