use serde::Serialize;

/// The place a forecast is issued for.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Municipality {
    /// Municipality name
    pub name: &'static str,
    /// Colombian department
    pub department: &'static str,
    /// Latitude of the urban centre in decimal degrees
    pub latitude: f64,
    /// Longitude of the urban centre in decimal degrees
    pub longitude: f64,
    /// Elevation of the urban centre in metres
    pub elevation_m: u32,
}

/// Madrid, Cundinamarca on the Bogota savanna, where radiative frosts hit
/// crops during the dry seasons.
pub const MADRID_CUNDINAMARCA: Municipality = Municipality {
    name: "Madrid",
    department: "Cundinamarca",
    latitude: 4.7333,
    longitude: -74.2667,
    elevation_m: 2554,
};

impl Municipality {
    /// "Madrid, Cundinamarca"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.department)
    }
}

#[cfg(test)]
mod tests {
    use super::MADRID_CUNDINAMARCA;

    #[test]
    fn display_name_joins_department() {
        assert_eq!(MADRID_CUNDINAMARCA.display_name(), "Madrid, Cundinamarca");
    }
}
