pub mod haversine;
pub mod osrm;

pub use haversine::HaversineEstimator;
pub use osrm::OsrmClient;
