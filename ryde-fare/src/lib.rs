pub mod engine;
pub mod quote;
pub mod tariff;
pub mod zone;

pub use engine::{compute_all_fares, compute_fare, FareRequest};
pub use quote::PriceQuote;
pub use tariff::{distance_price, is_double_fare_date, CHILD_SEAT_FEE, ZONE_CHARGE};
pub use zone::is_surcharge_zone;
