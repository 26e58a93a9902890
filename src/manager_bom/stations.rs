/// A BoM observation station as needed to build the observations url
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station {
    pub name: &'static str,
    pub region_code: &'static str,
    pub station_id: &'static str,
}

static STATIONS: [Station; 4] = [
    Station { name: "ARCHERFIELD", region_code: "Q", station_id: "94575" },
    Station { name: "ADELAIDE", region_code: "S", station_id: "94675" },
    Station { name: "BANKSTOWN", region_code: "N", station_id: "94765" },
    Station { name: "MELBOURNE", region_code: "V", station_id: "95936" },
];

/// Looks up a station by name, the name is matched case-insensitively
///
/// # Arguments
///
/// * 'name' - station name, e.g. 'Adelaide'
pub fn find_station(name: &str) -> Option<&'static Station> {
    let name = name.to_uppercase();
    STATIONS.iter().find(|s| s.name == name)
}

impl Station {
    /// Builds the url to the JSON observations document for this station
    ///
    /// # Arguments
    ///
    /// * 'host' - host serving the observations, normally www.bom.gov.au
    pub fn observations_url(&self, host: &str) -> String {
        format!("http://{host}/fwo/ID{region}60901/ID{region}60901.{id}.json",
                host = host, region = self.region_code, id = self.station_id)
    }
}
