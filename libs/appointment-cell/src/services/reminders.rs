// libs/appointment-cell/src/services/reminders.rs

use crate::models::{Appointment, ReminderPreview};

const TIME_FORMAT: &str = "%I:%M %p";

/// Static reminder templates. Nothing is delivered; these are previews.
pub struct ReminderService;

impl ReminderService {
    pub fn preview(appointment: &Appointment) -> ReminderPreview {
        ReminderPreview {
            appointment_id: appointment.appointment_id.clone(),
            badge: appointment.badge(),
            sms: Self::sms(appointment),
            email: Self::email(appointment),
        }
    }

    pub fn sms(appointment: &Appointment) -> String {
        format!(
            "Reminder: Hi {}, your appointment with {} is on {} at {}.",
            appointment.patient_name,
            appointment.doctor,
            display_date(appointment),
            display_time(appointment)
        )
    }

    pub fn email(appointment: &Appointment) -> String {
        format!(
            "Subject: Appointment reminder\n\nDear {},\n\nThis is a reminder for your appointment with {} on {} at {}.\n\nPlease complete the intake form.",
            appointment.patient_name,
            appointment.doctor,
            display_date(appointment),
            display_time(appointment)
        )
    }
}

fn display_date(appointment: &Appointment) -> String {
    appointment
        .appointment_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn display_time(appointment: &Appointment) -> String {
    appointment
        .slot_start
        .map(|start| start.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReminderState;
    use chrono::{NaiveDate, NaiveTime};

    fn appointment(status: &str) -> Appointment {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Appointment {
            appointment_id: "a-1".to_string(),
            created_at: None,
            patient_id: "p-1".to_string(),
            patient_name: "Jane Doe".to_string(),
            dob: None,
            email: String::new(),
            phone: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            doctor: "Dr. A".to_string(),
            location: "Clinic M".to_string(),
            visit_type: None,
            appointment_date: Some(date),
            slot_start: Some(date.and_time(NaiveTime::from_hms_opt(14, 30, 0).unwrap())),
            slot_end: None,
            insurance_carrier: String::new(),
            member_id: String::new(),
            group_number: String::new(),
            status: status.to_string(),
            forms_sent: false,
            reminder_1: ReminderState::Pending,
            reminder_2: ReminderState::Pending,
            reminder_3: ReminderState::Pending,
            cancellation_reason: String::new(),
        }
    }

    #[test]
    fn test_sms_template() {
        assert_eq!(
            ReminderService::sms(&appointment("scheduled")),
            "Reminder: Hi Jane Doe, your appointment with Dr. A is on 2024-05-01 at 02:30 PM."
        );
    }

    #[test]
    fn test_email_template() {
        let email = ReminderService::email(&appointment("scheduled"));
        assert!(email.starts_with("Subject: Appointment reminder\n\nDear Jane Doe,\n\n"));
        assert!(email.contains("with Dr. A on 2024-05-01 at 02:30 PM."));
        assert!(email.ends_with("\n\nPlease complete the intake form."));
    }

    #[test]
    fn test_badges() {
        assert_eq!(ReminderService::preview(&appointment("scheduled")).badge, "Scheduled");
        assert_eq!(ReminderService::preview(&appointment("confirmed")).badge, "Confirmed");
        assert_eq!(ReminderService::preview(&appointment("cancelled")).badge, "Cancelled");
        assert_eq!(ReminderService::preview(&appointment("")).badge, "Cancelled");
    }
}
