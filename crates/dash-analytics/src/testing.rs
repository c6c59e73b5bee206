//! CSV fixtures shared by the unit tests.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::engine::AnalyticsEngine;
use crate::schema::{AIRLINE_SCHEMA, LAUNCH_SCHEMA};

pub(crate) const AIRLINE_CSV: &str = "\
Year,Month,Reporting_Airline,CancellationCode,AirTime,DivAirportLandings,Flights,OriginState,DestState,CarrierDelay,WeatherDelay,NASDelay,SecurityDelay,LateAircraftDelay,Div1Airport
2010,1,AA,,120,0,1,CA,NY,10,0,5,0,20,
2010,1,AA,B,,0,1,CA,TX,,,,,,
2010,1,DL,,90,1,1,GA,CA,0,30,0,0,0,ATL
2010,2,DL,A,,0,1,GA,NY,,,,,,
2010,2,UA,,200,0,1,IL,CA,15,0,10,2,0,
2010,2,AA,,100,,1,TX,CA,5,5,5,0,5,
2010,2,AA,B,,0,1,CA,NY,,,,,,
2011,1,UA,,180,0,1,IL,NY,20,0,0,0,10,
2011,3,DL,C,,0,1,GA,TX,,,,,,
2011,3,AA,,110,2,1,NY,CA,0,0,0,0,0,
";

/// Default launch fixture: (flight number, site, class, payload, booster category).
pub(crate) const LAUNCH_ROWS: &[(i64, &str, i64, f64, &str)] = &[
    (1, "CCAFS LC-40", 0, 500.0, "v1.0"),
    (2, "CCAFS LC-40", 1, 2500.0, "v1.1"),
    (3, "VAFB SLC-4E", 1, 6000.0, "FT"),
    (4, "KSC LC-39A", 1, 9000.0, "B4"),
    (5, "CCAFS LC-40", 1, 3000.0, "FT"),
    (6, "KSC LC-39A", 0, 4000.0, "FT"),
];

pub(crate) fn launch_csv(rows: &[(i64, &str, i64, f64, &str)]) -> String {
    let mut csv = String::from(
        "Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category\n",
    );
    for (flight, site, class, payload, category) in rows {
        csv.push_str(&format!(
            "{flight},{site},{class},{payload},F9 {category} B{flight:04},{category}\n"
        ));
    }
    csv
}

pub(crate) fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}

pub(crate) fn airline_engine() -> AnalyticsEngine {
    let file = write_csv(AIRLINE_CSV);
    AnalyticsEngine::load_csv(&AIRLINE_SCHEMA, file.path()).expect("load airline fixture")
}

pub(crate) fn launch_engine() -> AnalyticsEngine {
    let file = write_csv(&launch_csv(LAUNCH_ROWS));
    AnalyticsEngine::load_csv(&LAUNCH_SCHEMA, file.path()).expect("load launch fixture")
}
