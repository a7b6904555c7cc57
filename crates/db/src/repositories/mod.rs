//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod announcement_repo;
pub mod appointment_repo;
pub mod goal_repo;
pub mod membership_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod role_repo;
pub mod session_repo;
pub mod spa_repo;
pub mod stats_repo;
pub mod trainer_repo;
pub mod user_repo;
pub mod workout_repo;

pub use announcement_repo::AnnouncementRepo;
pub use appointment_repo::AppointmentRepo;
pub use goal_repo::GoalRepo;
pub use membership_repo::{MembershipPlanRepo, MembershipRepo};
pub use notification_repo::NotificationRepo;
pub use payment_repo::PaymentRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use spa_repo::{SpaBookingRepo, SpaServiceRepo};
pub use stats_repo::StatsRepo;
pub use trainer_repo::TrainerRepo;
pub use user_repo::UserRepo;
pub use workout_repo::WorkoutRepo;
