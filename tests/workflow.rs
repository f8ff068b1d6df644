use std::path::{Path, PathBuf};

use rusty_latband::color;
use rusty_latband::config::WorkflowConfig;
use rusty_latband::data::filter::LatitudeBand;
use rusty_latband::data::sample::{write_point_shapefile, SampleAirport};
use rusty_latband::data::table::Table;
use rusty_latband::session::{Project, Provider};
use rusty_latband::workflow::{self, Notice};

fn config_for(shp: &Path) -> WorkflowConfig {
    let mut config = WorkflowConfig::default();
    config.source.shapefile = Some(shp.to_path_buf());
    config
}

fn write_airports(dir: &Path, airports: &[SampleAirport]) -> PathBuf {
    let shp = dir.join("ne_10m_airports.shp");
    write_point_shapefile(&shp, airports).unwrap();
    shp
}

fn three_airports() -> Vec<SampleAirport> {
    vec![
        SampleAirport::new("Alpha", "AAA", 5.0, 10.0),
        SampleAirport::new("Bravo", "BBB", -15.2, 20.0),
        SampleAirport::new("Charlie", "CCC", 0.0, 30.0),
    ]
}

#[test]
fn full_run_filters_three_airports_to_two() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_airports(dir.path(), &three_airports());
    let config = config_for(&shp);
    let mut project = Project::new();

    let report = workflow::run(&mut project, &config).unwrap();

    assert!(report.notices.is_empty(), "{:?}", report.notices);
    assert_eq!(report.exported_rows, 3);
    assert_eq!(report.filtered_rows, 2);
    assert_eq!(report.layers_added, 2);

    let attribute_text = std::fs::read_to_string(config.attribute_path()).unwrap();
    let lines: Vec<&str> = attribute_text.lines().collect();
    assert_eq!(lines[0], "Name,Iata Code,Latitude,Longitude");
    assert_eq!(lines[1], "Alpha, AAA, 5.0000, 10.0000");
    assert_eq!(lines.len(), 4);

    let filtered = std::fs::read_to_string(config.filtered_path()).unwrap();
    assert_eq!(
        filtered,
        "Name,Iata Code,Latitude,Longitude\n\
         Alpha,AAA,5.0000,10.0000\n\
         Charlie,CCC,0.0000,30.0000\n"
    );

    let source = project.layer("ne_10m_airports").unwrap();
    assert_eq!(source.feature_count(), 3);
    assert_eq!(source.color(), color::CORAL);
    assert_eq!(source.crs.as_ref().map(|c| c.code), Some(4326));

    let low = project.layer("240217_lowLatLayer").unwrap();
    assert!(low.is_valid());
    assert_eq!(low.provider, Provider::DelimitedText);
    assert_eq!(low.feature_count(), 2);
    assert_eq!(low.color(), color::GREEN);
    let first = low.features()[0].geometry.unwrap();
    assert_eq!((first.x, first.y), (10.0, 5.0));
}

#[test]
fn second_run_in_same_session_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_airports(dir.path(), &three_airports());
    let config = config_for(&shp);
    let mut project = Project::new();

    workflow::run(&mut project, &config).unwrap();
    let layers_before = project.len();
    let report = workflow::run(&mut project, &config).unwrap();

    assert_eq!(project.len(), layers_before);
    assert_eq!(report.layers_added, 0);
    assert_eq!(
        report.notices,
        vec![Notice::SourceAlreadyLoaded, Notice::FilteredAlreadyCreated]
    );
}

#[test]
fn project_file_carries_guards_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_airports(dir.path(), &three_airports());
    let config = config_for(&shp);
    let project_path = dir.path().join("session.json");

    let mut project = Project::open(&project_path).unwrap();
    workflow::run(&mut project, &config).unwrap();
    project.save().unwrap();

    let mut reopened = Project::open(&project_path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.layer("240217_lowLatLayer").unwrap().color(), color::GREEN);

    let report = workflow::run(&mut reopened, &config).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(
        report.notices,
        vec![Notice::SourceAlreadyLoaded, Notice::FilteredAlreadyCreated]
    );
}

#[test]
fn filtered_file_is_exactly_the_in_band_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut airports = vec![
        SampleAirport::new("North Edge", "NED", 10.0, 1.0),
        SampleAirport::new("South Edge", "SED", -10.0, 2.0),
        SampleAirport::new("Just Outside", "OUT", 10.00006, 3.0),
        SampleAirport::new("Kai Tak, Hong Kong", "HKG", 22.308, 114.215),
        SampleAirport::new("Quoted \"Field\"", "QQQ", -3.5, 4.0),
    ];
    airports.push(SampleAirport {
        name: "No Code".to_string(),
        iata_code: None,
        lat: 1.0,
        lon: 1.0,
    });
    for i in 0..40 {
        let lat = -40.0 + 2.0 * i as f64 + 0.123456;
        airports.push(SampleAirport::new(&format!("A{i}"), &format!("C{i:02}"), lat, -lat));
    }
    let shp = write_airports(dir.path(), &airports);
    let config = config_for(&shp);
    let mut project = Project::new();
    workflow::run(&mut project, &config).unwrap();

    let full = Table::read_csv(&config.attribute_path()).unwrap();
    let filtered = Table::read_csv(&config.filtered_path()).unwrap();

    assert_eq!(full.len(), airports.len());
    assert_eq!(full.headers, filtered.headers);

    let lat_idx = full.column_index("Latitude").unwrap();
    let band = LatitudeBand::TROPICS;
    let expected: Vec<Vec<String>> = full
        .rows
        .iter()
        .filter(|row| band.contains(row[lat_idx].parse::<f64>().unwrap()))
        .cloned()
        .collect();
    assert_eq!(filtered.rows, expected);

    // 10.00006 rounds to 10.0001 in the export, which is outside the band.
    assert!(filtered.rows.iter().all(|r| r[1] != "OUT"));
    assert!(filtered.rows.iter().any(|r| r[1] == "NED"));
    assert!(filtered.rows.iter().any(|r| r[1] == "SED"));
    assert!(filtered.rows.iter().any(|r| r[0] == "Quoted \"Field\""));
}

#[test]
fn ordinates_always_have_four_decimals() {
    let dir = tempfile::tempdir().unwrap();
    let airports = vec![
        SampleAirport::new("Int", "INT", 3.0, -7.0),
        SampleAirport::new("Long", "LNG", 1.123456789, 103.987654321),
        SampleAirport::new("Neg", "NEG", -0.00004, -179.99999),
    ];
    let shp = write_airports(dir.path(), &airports);
    let config = config_for(&shp);
    workflow::run(&mut Project::new(), &config).unwrap();

    let full = Table::read_csv(&config.attribute_path()).unwrap();
    for row in &full.rows {
        for cell in &row[2..4] {
            let (_, frac) = cell.split_once('.').unwrap();
            assert_eq!(frac.len(), 4, "cell {cell}");
        }
    }
}

#[test]
fn missing_shapefile_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("absent.shp"));
    let mut project = Project::new();
    let err = workflow::run(&mut project, &config).unwrap_err();
    assert!(matches!(err, rusty_latband::WorkflowError::Shapefile { .. }));
    assert!(project.is_empty());
}

#[test]
fn custom_band_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_airports(dir.path(), &three_airports());
    let mut config = config_for(&shp);
    config.filter.min = -20.0;
    config.filter.max = 1.0;
    config.output.directory = Some(dir.path().join("out"));

    let report = workflow::run(&mut Project::new(), &config).unwrap();
    assert_eq!(report.filtered_rows, 2);
    assert!(dir.path().join("out").join("240217_lowLat.csv").exists());
}

#[test]
fn semicolon_delimiter_round_trips_into_a_valid_layer() {
    let dir = tempfile::tempdir().unwrap();
    let shp = write_airports(dir.path(), &three_airports());
    let mut config = config_for(&shp);
    config.layer.delimiter = ";".to_string();
    let mut project = Project::new();

    let report = workflow::run(&mut project, &config).unwrap();

    assert!(report.notices.is_empty(), "{:?}", report.notices);
    let filtered = std::fs::read_to_string(config.filtered_path()).unwrap();
    assert!(filtered.starts_with("Name;Iata Code;Latitude;Longitude\n"), "{filtered}");

    let low = project.layer("240217_lowLatLayer").unwrap();
    assert!(low.is_valid(), "{:?}", low.error());
    assert_eq!(low.feature_count(), 2);
}

#[test]
fn codes_with_commas_and_quotes_reach_the_filtered_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let airports = vec![
        SampleAirport::new("Comma Code", "X,Y", 5.0, 10.0),
        SampleAirport::new("Quote Code", "Q\"Q", 1.0, 11.0),
        SampleAirport::new("Far North", "FAR", 45.0, 12.0),
    ];
    let shp = write_airports(dir.path(), &airports);
    let config = config_for(&shp);
    let mut project = Project::new();

    let report = workflow::run(&mut project, &config).unwrap();
    assert_eq!(report.filtered_rows, 2);

    let filtered = Table::read_csv(&config.filtered_path()).unwrap();
    assert_eq!(filtered.rows[0], ["Comma Code", "X,Y", "5.0000", "10.0000"]);
    assert_eq!(filtered.rows[1], ["Quote Code", "Q\"Q", "1.0000", "11.0000"]);

    let low = project.layer("240217_lowLatLayer").unwrap();
    assert!(low.is_valid());
    assert_eq!(low.feature_count(), 2);
}
