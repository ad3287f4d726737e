pub mod detection;
pub mod notifications;

pub use detection::{overdue_participants, overdue_threshold, OverdueParticipant};
pub use notifications::{notifications, Notification};
