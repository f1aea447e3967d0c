pub mod attendance;

pub mod auth;

pub mod certificates;

pub mod courses;

pub mod enrollments;

pub mod events;

pub mod finance;

pub mod messaging;

pub mod notifications;

pub mod students;

pub mod system;

pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use certificates::configure_certificate_routes;
pub use courses::{configure_batch_routes, configure_course_routes, configure_trainer_routes};
pub use enrollments::configure_enrollment_routes;
pub use events::configure_event_routes;
pub use finance::configure_finance_routes;
pub use messaging::configure_messaging_routes;
pub use notifications::configure_notification_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
