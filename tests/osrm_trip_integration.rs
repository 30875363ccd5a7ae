//! Trip optimization against a real OSRM backend.
//!
//! Needs a dataset already prepared for the MLD pipeline
//! (`osrm-extract`, `osrm-partition`, `osrm-customize`) covering the Gulf
//! states. Point `OSRM_DATA_DIR` at the directory holding it and, if the
//! file is not `gcc-states-latest.osrm`, set `OSRM_DATASET`. Without
//! `OSRM_DATA_DIR` the test is skipped.

mod fixtures;

use std::env;
use std::path::PathBuf;

use testcontainers::core::{IntoContainerPort, Mount};
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, ReuseDirective, TestcontainersError};

use trip_planner::model::{Location, WaypointId, WaypointType};
use trip_planner::osrm::{OsrmClient, OsrmConfig};
use trip_planner::planner::Planner;
use trip_planner::traits::{Geocoder, TripOptimizer};

use fixtures::{DUBAI, HOPS};

struct NoSearch;

impl Geocoder for NoSearch {
    fn search(&self, _query: &str) -> Vec<Location> {
        Vec::new()
    }
}

fn osrm_container(
    data_dir: PathBuf,
    dataset: &str,
) -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let image = GenericImage::new("osrm/osrm-backend", "latest")
        .with_exposed_port(5000.tcp())
        .with_mount(Mount::bind_mount(
            data_dir.to_string_lossy().to_string(),
            "/data",
        ))
        .with_cmd(vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            "mld".to_string(),
            format!("/data/{}", dataset),
        ])
        .with_container_name(format!("trip-planner-osrm-{}", dataset.replace('.', "-")))
        .with_startup_timeout(std::time::Duration::from_secs(30))
        .with_reuse(ReuseDirective::Always);

    let container = image.start()?;
    let port = container.get_host_port_ipv4(5000.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

fn hop(name: &str) -> Location {
    HOPS.iter()
        .find(|place| place.name == name)
        .map(|place| place.location())
        .unwrap_or_else(|| panic!("no fixture named {}", name))
}

#[test]
fn osrm_trip_keeps_endpoints_and_identities() {
    let Ok(data_dir) = env::var("OSRM_DATA_DIR") else {
        eprintln!("OSRM_DATA_DIR not set, skipping OSRM trip test");
        return;
    };
    let dataset = env::var("OSRM_DATASET").unwrap_or_else(|_| "gcc-states-latest.osrm".to_string());

    let (container, base_url) =
        osrm_container(PathBuf::from(data_dir), &dataset).expect("start OSRM container");

    let client = OsrmClient::new(OsrmConfig {
        base_url,
        profile: "driving".to_string(),
        timeout_secs: 10,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");

    let coordinates = [DUBAI.location().coords(), hop("Doha").coords()];

    // osrm-routed accepts connections before it has loaded the dataset.
    let trip = {
        let start = std::time::Instant::now();
        loop {
            match client.optimize(&coordinates) {
                Ok(trip) => break trip,
                Err(err) if start.elapsed() < std::time::Duration::from_secs(15) => {
                    eprintln!("OSRM not ready yet: {}", err);
                    std::thread::sleep(std::time::Duration::from_millis(500));
                }
                Err(err) => {
                    if let Ok(stderr) = container.stderr_to_vec() {
                        eprintln!("OSRM stderr:\n{}", String::from_utf8_lossy(&stderr));
                    }
                    panic!("OSRM trip failed: {}", err);
                }
            }
        }
    };
    assert_eq!(trip.stops.len(), 2);
    assert_eq!(trip.legs.len(), 1);
    assert!(trip.distance > 0.0);

    let mut planner = Planner::new(NoSearch, &client);
    let doha = planner.add_hop().unwrap();
    planner.select_location(&WaypointId::start(), DUBAI.location()).unwrap();
    planner.select_location(&doha, hop("Doha")).unwrap();
    planner
        .select_location(&WaypointId::destination(), hop("Abu Dhabi"))
        .unwrap();

    let route = planner.optimize().expect("optimize via OSRM").clone();

    // Snapped coordinates never match exactly; every stop must still map
    // back onto a user waypoint.
    assert_eq!(route.waypoints.len(), 3);
    assert_eq!(route.waypoints[0].waypoint_type, WaypointType::Start);
    assert_eq!(route.waypoints[2].waypoint_type, WaypointType::Destination);
    assert_eq!(route.waypoints[1].original_waypoint_id, doha);
    assert!(route.waypoints.iter().all(|w| !w.original_waypoint_id.as_str().starts_with("osrm-")));
    assert!(!route.coordinates.is_empty());
    assert!(route.distance.ends_with(" km"));

    drop(planner);
    drop(container);
}
