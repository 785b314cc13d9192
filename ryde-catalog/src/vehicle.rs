use serde::Serialize;

/// A bookable vehicle class.
///
/// Compiled-in reference data: the fleet is fixed per deployment and never
/// mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleClass {
    pub id: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub passengers: u8,
    pub suitcases: u8,
    pub handbags: u8,
    /// Applied to the distance price before surcharges.
    pub fare_multiplier: f64,
    pub premium: bool,
}

const CATALOG: [VehicleClass; 7] = [
    VehicleClass {
        id: "saloon",
        name: "Saloon",
        subtitle: "Standard Family Size",
        passengers: 4,
        suitcases: 1,
        handbags: 3,
        fare_multiplier: 1.0,
        premium: false,
    },
    VehicleClass {
        id: "executive",
        name: "Executive",
        subtitle: "Executive Car",
        passengers: 3,
        suitcases: 1,
        handbags: 2,
        fare_multiplier: 1.5,
        premium: true,
    },
    VehicleClass {
        id: "estate",
        name: "Estate",
        subtitle: "Standard Family Size",
        passengers: 4,
        suitcases: 2,
        handbags: 3,
        fare_multiplier: 1.15,
        premium: false,
    },
    VehicleClass {
        id: "mvp",
        name: "MVP",
        subtitle: "Large Family Size",
        passengers: 6,
        suitcases: 3,
        handbags: 3,
        fare_multiplier: 1.35,
        premium: false,
    },
    VehicleClass {
        id: "mvp-executive",
        name: "MVP Executive",
        subtitle: "Executive MPV",
        passengers: 5,
        suitcases: 4,
        handbags: 4,
        fare_multiplier: 1.75,
        premium: true,
    },
    VehicleClass {
        id: "7seater",
        name: "7 Seater",
        subtitle: "Large Family Size",
        passengers: 6,
        suitcases: 4,
        handbags: 4,
        fare_multiplier: 1.6,
        premium: false,
    },
    VehicleClass {
        id: "9seater",
        name: "9-Seater Minibus",
        subtitle: "Extra Large Group",
        passengers: 8,
        suitcases: 4,
        handbags: 5,
        fare_multiplier: 2.0,
        premium: false,
    },
];

/// The ordered fleet, as presented to the customer.
pub fn catalog() -> &'static [VehicleClass] {
    &CATALOG
}

/// Look up a vehicle class by id.
pub fn find(id: &str) -> Option<&'static VehicleClass> {
    CATALOG.iter().find(|v| v.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_seven_classes() {
        assert_eq!(catalog().len(), 7);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = catalog().iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_find_known_and_unknown() {
        let saloon = find("saloon").unwrap();
        assert_eq!(saloon.fare_multiplier, 1.0);
        assert!(find("rickshaw").is_none());
    }

    #[test]
    fn test_multipliers_are_positive() {
        for v in catalog() {
            assert!(v.fare_multiplier > 0.0, "{} multiplier", v.id);
        }
    }

    #[test]
    fn test_premium_flags() {
        assert!(find("executive").unwrap().premium);
        assert!(find("mvp-executive").unwrap().premium);
        assert!(!find("saloon").unwrap().premium);
    }
}
