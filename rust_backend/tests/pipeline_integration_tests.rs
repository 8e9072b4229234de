//! End-to-end tests over CSV files: load, classify, filter, aggregate, export.
//!
//! These tests ensure that:
//! 1. Point, block and zone tables load through the session
//! 2. Filters narrow every downstream aggregate
//! 3. Comparisons and zone summaries follow the documented bands
//! 4. Exports round values and mark undefined percentages

use orchard_rust::config::ViewerConfig;
use orchard_rust::core::classes::{ClassScheme, HealthClass, ZoneLevel};
use orchard_rust::core::schema::Attribute;
use orchard_rust::services::{GroupKey, HealthStatus, Trend};
use orchard_rust::session::SessionContext;
use orchard_rust::transformations::{Choice, FilterSelection};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

// ==================== Helper Functions ====================

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn seven_class_config() -> ViewerConfig {
    ViewerConfig::from_toml_str("[dataset]\nscheme = \"seven\"\n").unwrap()
}

/// 100 points: 60 with code 6 and 40 with code 2.
fn coded_points() -> String {
    let mut csv = String::from("id,Cuartel,ndvi_clase\n");
    for i in 0..100 {
        let code = if i < 60 { 6 } else { 2 };
        csv.push_str(&format!("{},C{},{}\n", i, i % 4, code));
    }
    csv
}

fn two_flight_points() -> String {
    let mut csv = String::from("Cuartel,Especie,Cultivo,fecha_vuelo,ndvi,ndvi_clase\n");
    for (date, value, label) in [
        ("2023-10-15", 0.45, "Medio"),
        ("2023-10-15", 0.55, "Medio-alto"),
        ("20231120", 0.50, "Medio alto"),
        ("20231120", 0.60, "Alto"),
    ] {
        csv.push_str(&format!("C1,Cerezo,Frutal,{},{},{}\n", date, value, label));
    }
    csv
}

// ==================== Scenarios ====================

#[test]
fn test_seven_class_codes_split_healthy_and_critical() {
    let points = csv_file(&coded_points());
    let mut session = SessionContext::new(seven_class_config()).unwrap();
    session.load_points(points.path()).unwrap();

    let summary = session.summary("ndvi").unwrap();
    assert_eq!(summary.total_rows, 100);
    assert!((summary.healthy_fraction - 0.60).abs() < 1e-12);
    assert!((summary.critical_fraction - 0.40).abs() < 1e-12);
    assert_eq!(summary.count_of(HealthClass::High), 60);
    assert_eq!(summary.count_of(HealthClass::Low), 40);
}

#[test]
fn test_code_six_is_no_data_in_five_class_mode() {
    let points = csv_file(&coded_points());
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();

    let summary = session.summary("ndvi").unwrap();
    assert_eq!(summary.scheme, ClassScheme::Five);
    assert!((summary.no_data_fraction - 0.60).abs() < 1e-12);
    assert!((summary.critical_fraction - 0.40).abs() < 1e-12);
    assert_eq!(summary.healthy_fraction, 0.0);
}

#[test]
fn test_two_flights_ten_percent_improvement() {
    let points = csv_file(&two_flight_points());
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    let table = session.load_points(points.path()).unwrap();
    assert_eq!(table.flight_dates(), vec!["2023-10-15", "2023-11-20"]);

    let comparison = session.compare("ndvi", "15/10/2023", "2023-11-20").unwrap();
    assert!((comparison.delta_pct.unwrap() - 10.0).abs() < 1e-6);
    assert_eq!(comparison.trend, Trend::SignificantImprovement);
    assert_eq!(comparison.trend.label(), "Significant improvement");
}

#[test]
fn test_zero_first_mean_does_not_fail() {
    let points = csv_file(
        "fecha_vuelo,ndvi\n2023-10-15,0.0\n2023-10-15,0.0\n2023-11-20,0.3\n",
    );
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();

    let comparison = session.compare_first("ndvi").unwrap().unwrap();
    assert_eq!(comparison.delta_pct, None);
    assert_eq!(comparison.trend, Trend::Stable);
}

#[test]
fn test_variety_stage_without_column_keeps_rows() {
    let points = csv_file(&two_flight_points());
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();
    session.set_selection(FilterSelection {
        variety: Choice::parse("Lapins"),
        ..Default::default()
    });

    let outcome = session.filter().unwrap();
    assert_eq!(outcome.table.len(), 4);
    let variety = outcome
        .stages
        .iter()
        .find(|s| s.attribute == Attribute::Variety)
        .unwrap();
    assert!(variety.skipped);
}

// ==================== Polygons ====================

#[test]
fn test_block_table_and_zones() {
    let points = csv_file(&two_flight_points());
    let blocks = csv_file("Cuartel,Superficie_ha,Apla\nC1,0.5,2016\n");
    let zones = csv_file(
        "indice,clase,area_ha,n_arboles,fecha_vuelo,Cuartel\n\
         ndvi,1,0.1,5,2023-10-15,C1\n\
         ndvi,3,0.3,15,2023-10-15,C1\n\
         ndvi,2,0.5,25,2023-11-20,C1\n",
    );
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();
    assert!(session.load_blocks(blocks.path()).is_some());
    assert!(session.load_zones(zones.path()).is_some());

    let rows = session.block_table("ndvi").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].flight_date.as_deref(), Some("2023-10-15"));
    assert_eq!(rows[0].trees_per_ha, Some(4.0));

    session.set_selection(FilterSelection {
        flight_date: Choice::parse("20231015"),
        ..Default::default()
    });
    let summary = session.zone_summary("ndvi").unwrap();
    assert!((summary.total_area_ha - 0.4).abs() < 1e-12);
    let medium = summary.level(ZoneLevel::Medium).unwrap();
    assert_eq!(medium.area_pct, 0.0);
    let high = summary.level(ZoneLevel::High).unwrap();
    assert!((high.area_pct - 75.0).abs() < 1e-9);
}

#[test]
fn test_insights_on_loaded_table() {
    let points = csv_file(&two_flight_points());
    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();

    let insights = session.insights("ndvi").unwrap();
    assert_eq!(insights.status, HealthStatus::Good);
    assert!(insights.recommendations.is_empty());
}

// ==================== Exports ====================

#[test]
fn test_flight_breakdown_export() {
    let points = csv_file(&two_flight_points());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("flights.csv");

    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();
    session
        .export_breakdown("ndvi", GroupKey::FlightDate, &out)
        .unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].starts_with("flight_date,rows,mean"));
    assert!(lines[1].starts_with("2023-10-15,2,0.500,"));
    assert!(lines[2].starts_with("2023-11-20,2,0.550,"));
}

#[test]
fn test_points_export_keeps_filter() {
    let points = csv_file(&two_flight_points());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("points.csv");

    let mut session = SessionContext::new(ViewerConfig::default()).unwrap();
    session.load_points(points.path()).unwrap();
    session.set_selection(FilterSelection {
        flight_date: Choice::parse("2023-11-20"),
        ..Default::default()
    });
    session.export_points(&out).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "block,species,crop,flight_date,ndvi,ndvi_class");
    assert_eq!(lines[1], "C1,Cerezo,Frutal,2023-11-20,0.500,Medium-High");
    assert_eq!(lines.len(), 3);
}
