use std::sync::Arc;

use ryde_core::{BookingRepository, DistanceProvider};
use ryde_store::app_config::BusinessRules;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub distance: Arc<dyn DistanceProvider>,
    pub rules: BusinessRules,
}
