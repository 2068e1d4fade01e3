pub mod appointment;
pub mod booking;
pub mod reminders;

pub use appointment::AppointmentService;
pub use booking::BookingService;
pub use reminders::ReminderService;
