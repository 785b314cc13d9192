pub mod vehicle;

pub use vehicle::{catalog, find, VehicleClass};
