//! Live queue ordering and appointment reconciliation.
//!
//! Display order is urgent-first, then first-come-first-served by creation
//! time. An appointment may be pulled into the queue while it is still
//! Booked and no queue entry already carries its patient's name.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::models::{Appointment, AppointmentStatus, NewQueueEntry, Priority, QueueEntry, QueueStatus, QueueUpdate};

/// Estimated wait shown for walk-ins.
pub const WALK_IN_WAIT: &str = "15 min";

/// Estimated wait shown for patients who came from an appointment.
pub const SCHEDULED_WAIT: &str = "Scheduled";

/// Sort entries into display order in place.
///
/// Stable: entries with equal priority and timestamp keep their relative order.
pub fn order_queue(entries: &mut [QueueEntry]) {
    entries.sort_by(|a, b| {
        priority_rank(a.priority)
            .cmp(&priority_rank(b.priority))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::Urgent => 0,
        Priority::Normal => 1,
    }
}

/// Booked appointments whose patient is not already in the queue.
///
/// Linkage is by patient name, not appointment id.
pub fn eligible_appointments(queue: &[QueueEntry], appointments: &[Appointment]) -> Vec<Appointment> {
    let queued_names: HashSet<&str> = queue.iter().map(|e| e.patient_name.as_str()).collect();
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Booked && !queued_names.contains(a.patient_name.as_str()))
        .cloned()
        .collect()
}

/// Entry for a patient who walked in without an appointment.
pub fn walk_in<Tz: TimeZone>(patient_name: &str, priority: Priority, now: &DateTime<Tz>) -> NewQueueEntry
where
    Tz::Offset: std::fmt::Display,
{
    NewQueueEntry {
        patient_name: patient_name.trim().to_string(),
        priority,
        arrival: now.format("%H:%M").to_string(),
        est_wait: WALK_IN_WAIT.to_string(),
        appointment_id: None,
    }
}

/// Entry for a patient arriving for a booked appointment.
pub fn from_appointment(appointment: &Appointment, priority: Priority) -> NewQueueEntry {
    NewQueueEntry {
        patient_name: appointment.patient_name.clone(),
        priority,
        arrival: appointment.time.clone(),
        est_wait: SCHEDULED_WAIT.to_string(),
        appointment_id: Some(appointment.id),
    }
}

/// Hand a waiting patient to a doctor: doctor and status travel together.
pub fn assign_doctor(doctor_id: i32) -> QueueUpdate {
    QueueUpdate {
        doctor_id: Some(doctor_id),
        status: Some(QueueStatus::WithDoctor),
        ..Default::default()
    }
}

/// Close a visit that is with a doctor.
pub fn complete() -> QueueUpdate {
    QueueUpdate {
        status: Some(QueueStatus::Completed),
        ..Default::default()
    }
}

pub fn change_priority(priority: Priority) -> QueueUpdate {
    QueueUpdate {
        priority: Some(priority),
        ..Default::default()
    }
}

/// Action the front desk can take on a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    ChangePriority,
    AssignDoctor,
    MarkCompleted,
    Remove,
}

impl QueueStatus {
    /// Actions offered for an entry in this status.
    pub fn actions(&self) -> &'static [QueueAction] {
        match self {
            QueueStatus::Waiting => &[QueueAction::ChangePriority, QueueAction::AssignDoctor, QueueAction::Remove],
            QueueStatus::WithDoctor => &[QueueAction::ChangePriority, QueueAction::MarkCompleted, QueueAction::Remove],
            QueueStatus::Completed => &[QueueAction::Remove],
        }
    }

    pub fn allows(&self, action: QueueAction) -> bool {
        self.actions().contains(&action)
    }
}

/// Appointment ids already pushed to the live queue in this session.
#[derive(Debug, Clone, Default)]
pub struct QueuedAppointments {
    ids: HashSet<i32>,
}

impl QueuedAppointments {
    pub fn mark(&mut self, appointment_id: i32) {
        self.ids.insert(appointment_id);
    }

    /// Record every appointment id referenced by a loaded queue.
    pub fn observe(&mut self, queue: &[QueueEntry]) {
        self.ids.extend(queue.iter().filter_map(|e| e.appointment_id));
    }

    pub fn contains(&self, appointment_id: i32) -> bool {
        self.ids.contains(&appointment_id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether the appointments view offers "add to queue" for this row.
    pub fn offer_for(&self, appointment: &Appointment, today: NaiveDate) -> QueueOffer {
        if appointment.status != AppointmentStatus::Booked || !appointment.is_on(today) {
            QueueOffer::Hidden
        } else if self.contains(appointment.id) {
            QueueOffer::AlreadyQueued
        } else {
            QueueOffer::Available
        }
    }
}

/// Visibility of the "add to queue" control for an appointment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOffer {
    Hidden,
    AlreadyQueued,
    Available,
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub waiting: usize,
    pub with_doctor: usize,
    pub completed: usize,
    pub urgent: usize,
}

impl QueueStats {
    pub fn of(queue: &[QueueEntry]) -> Self {
        queue.iter().fold(Self::default(), |mut stats, entry| {
            match entry.status {
                QueueStatus::Waiting => stats.waiting += 1,
                QueueStatus::WithDoctor => stats.with_doctor += 1,
                QueueStatus::Completed => stats.completed += 1,
            }
            if entry.priority == Priority::Urgent && entry.status != QueueStatus::Completed {
                stats.urgent += 1;
            }
            stats
        })
    }
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};

    fn entry(id: i32, name: &str, priority: Priority, minute: i64) -> QueueEntry {
        let base = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        QueueEntry {
            id,
            patient_name: name.to_string(),
            priority,
            status: QueueStatus::Waiting,
            arrival: String::new(),
            est_wait: String::new(),
            created_at: base + Duration::minutes(minute),
            appointment_id: None,
            doctor_id: None,
        }
    }

    fn appointment(id: i32, name: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            patient_name: name.to_string(),
            doctor_id: 1,
            doctor_name: "Ada Grey".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time: "10:30".to_string(),
            status,
        }
    }

    fn ids(entries: &[QueueEntry]) -> Vec<i32> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_urgent_before_older_normal() {
        let mut queue = vec![entry(1, "Normal T1", Priority::Normal, 1), entry(2, "Urgent T2", Priority::Urgent, 2)];
        order_queue(&mut queue);
        assert_eq!(ids(&queue), vec![2, 1]);
    }

    #[test]
    fn test_fifo_within_priority() {
        let mut queue = vec![
            entry(1, "a", Priority::Normal, 30),
            entry(2, "b", Priority::Urgent, 20),
            entry(3, "c", Priority::Normal, 5),
            entry(4, "d", Priority::Urgent, 10),
            entry(5, "e", Priority::Normal, 15),
        ];
        order_queue(&mut queue);
        assert_eq!(ids(&queue), vec![4, 2, 3, 5, 1]);

        let first_normal = queue.iter().position(|e| e.priority == Priority::Normal).unwrap();
        assert!(queue[..first_normal].iter().all(|e| e.priority == Priority::Urgent));
        assert!(queue[first_normal..].iter().all(|e| e.priority == Priority::Normal));
        assert!(queue[first_normal..].windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_order_is_stable_for_ties() {
        let mut queue = vec![entry(1, "a", Priority::Normal, 0), entry(2, "b", Priority::Normal, 0)];
        order_queue(&mut queue);
        assert_eq!(ids(&queue), vec![1, 2]);
    }

    #[test]
    fn test_finalized_appointments_never_eligible() {
        let appointments = vec![
            appointment(1, "Booked Patient", AppointmentStatus::Booked),
            appointment(2, "Done Patient", AppointmentStatus::Completed),
            appointment(3, "Gone Patient", AppointmentStatus::Canceled),
        ];
        let eligible = eligible_appointments(&[], &appointments);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 1);
    }

    #[test]
    fn test_queued_patient_name_not_eligible() {
        let queue = vec![entry(10, "Sam Lee", Priority::Normal, 0)];
        let appointments = vec![
            appointment(1, "Sam Lee", AppointmentStatus::Booked),
            appointment(2, "Kim Park", AppointmentStatus::Booked),
        ];
        let eligible = eligible_appointments(&queue, &appointments);
        assert_eq!(eligible.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_walk_in_gets_fixed_wait() {
        let now = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 8, 5, 42)
            .unwrap();
        let entry = walk_in("  Jane Doe ", Priority::Normal, &now);
        assert_eq!(entry.patient_name, "Jane Doe");
        assert_eq!(entry.arrival, "08:05");
        assert_eq!(entry.est_wait, WALK_IN_WAIT);
        assert_eq!(entry.appointment_id, None);
    }

    #[test]
    fn test_appointment_entry_is_scheduled() {
        let entry = from_appointment(&appointment(7, "Sam Lee", AppointmentStatus::Booked), Priority::Urgent);
        assert_eq!(entry.arrival, "10:30");
        assert_eq!(entry.est_wait, SCHEDULED_WAIT);
        assert_eq!(entry.appointment_id, Some(7));
        assert_eq!(entry.priority, Priority::Urgent);
    }

    #[test]
    fn test_assign_doctor_sets_doctor_and_status() {
        let update = assign_doctor(7);
        assert_eq!(update.doctor_id, Some(7));
        assert_eq!(update.status, Some(QueueStatus::WithDoctor));
        assert_eq!(update.priority, None);
    }

    #[test]
    fn test_actions_per_status() {
        assert!(QueueStatus::Waiting.allows(QueueAction::AssignDoctor));
        assert!(!QueueStatus::Waiting.allows(QueueAction::MarkCompleted));
        assert!(QueueStatus::WithDoctor.allows(QueueAction::MarkCompleted));
        assert!(!QueueStatus::WithDoctor.allows(QueueAction::AssignDoctor));
        assert_eq!(QueueStatus::Completed.actions(), &[QueueAction::Remove]);
    }

    #[test]
    fn test_queue_offer() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut queued = QueuedAppointments::default();
        let booked = appointment(1, "Sam Lee", AppointmentStatus::Booked);

        assert_eq!(queued.offer_for(&booked, today), QueueOffer::Available);
        assert_eq!(queued.offer_for(&booked, today.succ_opt().unwrap()), QueueOffer::Hidden);
        assert_eq!(
            queued.offer_for(&appointment(2, "x", AppointmentStatus::Canceled), today),
            QueueOffer::Hidden
        );

        queued.mark(1);
        assert_eq!(queued.offer_for(&booked, today), QueueOffer::AlreadyQueued);

        queued.clear();
        assert_eq!(queued.offer_for(&booked, today), QueueOffer::Available);
    }

    #[test]
    fn test_observe_loaded_queue() {
        let mut linked = entry(1, "Sam Lee", Priority::Normal, 0);
        linked.appointment_id = Some(42);
        let mut queued = QueuedAppointments::default();
        queued.observe(&[linked, entry(2, "Walk In", Priority::Normal, 1)]);
        assert!(queued.contains(42));
    }

    #[test]
    fn test_stats() {
        let mut with_doctor = entry(2, "b", Priority::Urgent, 1);
        with_doctor.status = QueueStatus::WithDoctor;
        let mut done = entry(3, "c", Priority::Urgent, 2);
        done.status = QueueStatus::Completed;
        let stats = QueueStats::of(&[entry(1, "a", Priority::Normal, 0), with_doctor, done]);
        assert_eq!(
            stats,
            QueueStats {
                waiting: 1,
                with_doctor: 1,
                completed: 1,
                urgent: 1,
            }
        );
    }
}
