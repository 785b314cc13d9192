pub mod app_config;
pub mod booking_repo;
pub mod database;

pub use app_config::Config;
pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
