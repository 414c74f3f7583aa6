//! Roster store: vehicles, drivers and destinations

use manifest_types::{ValidationError, Vehicle};

/// Normalize a plate the way it is keyed: trimmed, upper-case
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// The three independent roster sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    fleet: Vec<Vehicle>,
    drivers: Vec<String>,
    destinations: Vec<String>,
}

impl Roster {
    pub fn new(fleet: Vec<Vehicle>, drivers: Vec<String>, destinations: Vec<String>) -> Self {
        Self {
            fleet,
            drivers,
            destinations,
        }
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn drivers(&self) -> &[String] {
        &self.drivers
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn find_vehicle(&self, plate: &str) -> Option<&Vehicle> {
        self.fleet.iter().find(|v| v.plate == plate)
    }

    pub fn contains_plate(&self, plate: &str) -> bool {
        self.find_vehicle(plate).is_some()
    }

    /// Add a vehicle with no driver assigned
    pub fn add_vehicle(&mut self, plate: &str) -> Result<&Vehicle, ValidationError> {
        let plate = normalize_plate(plate);
        if plate.is_empty() {
            return Err(ValidationError::EmptyPlate);
        }
        if self.contains_plate(&plate) {
            return Err(ValidationError::DuplicatePlate(plate));
        }
        self.fleet.push(Vehicle::new(plate));
        Ok(&self.fleet[self.fleet.len() - 1])
    }

    /// Remove a vehicle. Its saved shift records and archives are left alone.
    pub fn delete_vehicle(&mut self, index: usize) -> Result<Vehicle, ValidationError> {
        let len = self.fleet.len();
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        Ok(self.fleet.remove(index))
    }

    /// Position of a plate in the fleet list
    pub fn vehicle_index(&self, plate: &str) -> Option<usize> {
        let plate = normalize_plate(plate);
        self.fleet.iter().position(|v| v.plate == plate)
    }

    /// Assign (or with an empty name, unassign) a vehicle's driver
    pub fn assign_driver(&mut self, plate: &str, driver: &str) -> Result<(), ValidationError> {
        let driver = driver.trim();
        if !driver.is_empty() && !self.drivers.iter().any(|d| d == driver) {
            return Err(ValidationError::UnknownDriver(driver.to_string()));
        }
        let plate = normalize_plate(plate);
        let vehicle = self
            .fleet
            .iter_mut()
            .find(|v| v.plate == plate)
            .ok_or(ValidationError::UnknownPlate(plate))?;
        vehicle.driver = driver.to_string();
        Ok(())
    }

    /// Add a driver; returns false when the name was already listed
    pub fn add_driver(&mut self, name: &str) -> Result<bool, ValidationError> {
        add_unique(&mut self.drivers, name)
    }

    /// Remove a driver and blank the assignment on any vehicle that had it.
    /// Returns the number of vehicles unassigned. Saved shift records keep
    /// the name as plain text.
    pub fn delete_driver(&mut self, name: &str) -> Result<usize, ValidationError> {
        let name = name.trim();
        let pos = self
            .drivers
            .iter()
            .position(|d| d == name)
            .ok_or_else(|| ValidationError::UnknownDriver(name.to_string()))?;
        self.drivers.remove(pos);

        let mut unassigned = 0;
        for vehicle in self.fleet.iter_mut().filter(|v| v.driver == name) {
            vehicle.driver.clear();
            unassigned += 1;
        }
        Ok(unassigned)
    }

    /// Add a destination; returns false when it was already listed
    pub fn add_destination(&mut self, name: &str) -> Result<bool, ValidationError> {
        add_unique(&mut self.destinations, name)
    }

    /// Remove a destination; returns false when it was not listed
    pub fn delete_destination(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.destinations.len();
        self.destinations.retain(|d| d != name);
        self.destinations.len() != before
    }

    pub fn into_parts(self) -> (Vec<Vehicle>, Vec<String>, Vec<String>) {
        (self.fleet, self.drivers, self.destinations)
    }
}

fn add_unique(set: &mut Vec<String>, name: &str) -> Result<bool, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if set.iter().any(|existing| existing == name) {
        return Ok(false);
    }
    set.push(name.to_string());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vehicle_normalizes_plate() {
        let mut roster = Roster::default();
        let v = roster.add_vehicle("  abc-1 ").unwrap();
        assert_eq!(v.plate, "ABC-1");
        assert_eq!(v.driver, "");
    }

    #[test]
    fn test_add_vehicle_rejects_empty_and_duplicate() {
        let mut roster = Roster::default();
        roster.add_vehicle("ABC-1").unwrap();
        assert_eq!(roster.add_vehicle("  ").unwrap_err(), ValidationError::EmptyPlate);
        assert_eq!(
            roster.add_vehicle("abc-1").unwrap_err(),
            ValidationError::DuplicatePlate("ABC-1".to_string())
        );
        assert_eq!(roster.fleet().len(), 1);
    }

    #[test]
    fn test_delete_vehicle_out_of_range() {
        let mut roster = Roster::default();
        roster.add_vehicle("ABC-1").unwrap();
        assert!(roster.delete_vehicle(3).is_err());
        assert_eq!(roster.delete_vehicle(0).unwrap().plate, "ABC-1");
        assert!(roster.fleet().is_empty());
    }

    #[test]
    fn test_drivers_dedupe() {
        let mut roster = Roster::default();
        assert!(roster.add_driver(" Ana ").unwrap());
        assert!(!roster.add_driver("Ana").unwrap());
        assert_eq!(roster.add_driver("").unwrap_err(), ValidationError::EmptyName);
        assert_eq!(roster.drivers(), &["Ana".to_string()]);
    }

    #[test]
    fn test_delete_driver_blanks_assignments() {
        let mut roster = Roster::default();
        roster.add_driver("Ana").unwrap();
        roster.add_driver("Ben").unwrap();
        roster.add_vehicle("ABC-1").unwrap();
        roster.add_vehicle("XYZ-9").unwrap();
        roster.assign_driver("ABC-1", "Ana").unwrap();
        roster.assign_driver("xyz-9", "Ben").unwrap();

        assert_eq!(roster.delete_driver("Ana").unwrap(), 1);
        assert_eq!(roster.find_vehicle("ABC-1").unwrap().driver, "");
        assert_eq!(roster.find_vehicle("XYZ-9").unwrap().driver, "Ben");
        assert!(roster.delete_driver("Ana").is_err());
    }

    #[test]
    fn test_assign_unknown_driver_fails() {
        let mut roster = Roster::default();
        roster.add_vehicle("ABC-1").unwrap();
        assert!(matches!(
            roster.assign_driver("ABC-1", "Nobody"),
            Err(ValidationError::UnknownDriver(_))
        ));
        assert!(matches!(
            roster.assign_driver("NOPE", ""),
            Err(ValidationError::UnknownPlate(_))
        ));
    }

    #[test]
    fn test_destinations() {
        let mut roster = Roster::default();
        assert!(roster.add_destination("Warehouse").unwrap());
        assert!(!roster.add_destination("Warehouse").unwrap());
        assert!(roster.delete_destination("Warehouse"));
        assert!(!roster.delete_destination("Warehouse"));
    }
}
