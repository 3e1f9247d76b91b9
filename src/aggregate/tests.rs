use super::*;
use crate::source::{MemoryFile, MemoryOpener};
use chrono::NaiveDate;
use proptest::prelude::*;

const UNITS: &str = "seconds since 1993-01-01 00:00:00.000";
const DAY: f64 = 86_400.0;

fn flash_file(start: f64, end: f64, flashes: &[(f64, f64)]) -> MemoryFile {
    let (lat, lon): (Vec<f64>, Vec<f64>) = flashes.iter().copied().unzip();
    MemoryFile::new()
        .with_variable(ORBIT_START_FIELD, vec![start], Some(UNITS))
        .with_variable(ORBIT_END_FIELD, vec![end], Some(UNITS))
        .with_variable(FLASH_LAT_FIELD, lat, None)
        .with_variable(FLASH_LON_FIELD, lon, None)
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from("/data").join(n)).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==================== Aggregation Order ====================

#[test]
fn test_two_file_example() {
    let opener = MemoryOpener::new()
        .with_file("ISS_LIS_A.nc", flash_file(0.0, 10.0, &[(10.0, 20.0)]))
        .with_file(
            "ISS_LIS_B.nc",
            flash_file(5.0, 15.0, &[(11.0, 21.0), (12.0, 22.0)]),
        );

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc", "ISS_LIS_B.nc"]))
        .unwrap();

    let records: Vec<_> = result.records().map(|r| (r.lat, r.lon)).collect();
    assert_eq!(records, vec![(10.0, 20.0), (11.0, 21.0), (12.0, 22.0)]);
    assert_eq!(result.len(), 3);

    let range = result.date_range().unwrap();
    assert_eq!(range.begin(), date(1993, 1, 1));
    assert_eq!(range.end(), date(1993, 1, 1));
    assert!(range.is_single_day());

    assert_eq!(
        result.sources(),
        &[
            SourceSummary {
                path: PathBuf::from("/data/ISS_LIS_A.nc"),
                flash_count: 1
            },
            SourceSummary {
                path: PathBuf::from("/data/ISS_LIS_B.nc"),
                flash_count: 2
            },
        ]
    );
}

#[test]
fn test_file_order_is_preserved() {
    let opener = MemoryOpener::new()
        .with_file("ISS_LIS_A.nc", flash_file(0.0, 10.0, &[(1.0, 1.0)]))
        .with_file("ISS_LIS_B.nc", flash_file(0.0, 10.0, &[(2.0, 2.0)]));

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_B.nc", "ISS_LIS_A.nc"]))
        .unwrap();

    assert_eq!(result.lat(), &[2.0, 1.0]);
    assert_eq!(result.lon(), &[2.0, 1.0]);
}

#[test]
fn test_file_without_flashes() {
    let opener = MemoryOpener::new()
        .with_file("ISS_LIS_A.nc", flash_file(0.0, 10.0, &[]))
        .with_file("ISS_LIS_B.nc", flash_file(DAY, DAY + 10.0, &[(5.0, 6.0)]));

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc", "ISS_LIS_B.nc"]))
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.sources()[0].flash_count, 0);
    let range = result.date_range().unwrap();
    assert_eq!(range.begin(), date(1993, 1, 1));
    assert_eq!(range.end(), date(1993, 1, 2));
    assert_eq!(range.file_token(), "19930101_19930102");
}

#[test]
fn test_empty_file_list() {
    let result = FlashAggregator::new(MemoryOpener::new())
        .aggregate(&[])
        .unwrap();

    assert!(result.is_empty());
    assert!(result.lon().is_empty());
    assert!(result.date_range().is_none());
    assert!(result.sources().is_empty());
}

// ==================== Date Range ====================

#[test]
fn test_date_range_uses_min_start_and_max_end() {
    let opener = MemoryOpener::new()
        .with_file("ISS_LIS_A.nc", flash_file(3.0 * DAY, 3.0 * DAY + 100.0, &[]))
        .with_file("ISS_LIS_B.nc", flash_file(DAY, DAY + 100.0, &[]))
        .with_file("ISS_LIS_C.nc", flash_file(2.0 * DAY, 5.0 * DAY, &[]));

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc", "ISS_LIS_B.nc", "ISS_LIS_C.nc"]))
        .unwrap();

    let range = result.date_range().unwrap();
    assert_eq!(range.begin(), date(1993, 1, 2));
    assert_eq!(range.end(), date(1993, 1, 6));
    assert_eq!(range.to_string(), "January 02, 1993 - January 06, 1993");
}

#[test]
fn test_multi_valued_time_fields() {
    let file = MemoryFile::new()
        .with_variable(ORBIT_START_FIELD, vec![2.0 * DAY, DAY], Some(UNITS))
        .with_variable(ORBIT_END_FIELD, vec![2.0 * DAY + 5.0, 4.0 * DAY], Some(UNITS))
        .with_variable(FLASH_LAT_FIELD, vec![], None)
        .with_variable(FLASH_LON_FIELD, vec![], None);
    let opener = MemoryOpener::new().with_file("ISS_LIS_A.nc", file);

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap();

    let range = result.date_range().unwrap();
    assert_eq!(range.begin(), date(1993, 1, 2));
    assert_eq!(range.end(), date(1993, 1, 5));
}

#[test]
fn test_fields_decoded_with_their_own_units() {
    // start in seconds, end in days: each field uses its declared units
    let file = MemoryFile::new()
        .with_variable(ORBIT_START_FIELD, vec![DAY], Some(UNITS))
        .with_variable(ORBIT_END_FIELD, vec![3.0], Some("days since 1993-01-01"))
        .with_variable(FLASH_LAT_FIELD, vec![], None)
        .with_variable(FLASH_LON_FIELD, vec![], None);
    let opener = MemoryOpener::new().with_file("ISS_LIS_A.nc", file);

    let result = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap();

    let range = result.date_range().unwrap();
    assert_eq!(range.begin(), date(1993, 1, 2));
    assert_eq!(range.end(), date(1993, 1, 4));
}

// ==================== Error Handling ====================

#[test]
fn test_mismatched_lengths_abort() {
    let bad = MemoryFile::new()
        .with_variable(ORBIT_START_FIELD, vec![0.0], Some(UNITS))
        .with_variable(ORBIT_END_FIELD, vec![10.0], Some(UNITS))
        .with_variable(FLASH_LAT_FIELD, vec![1.0, 2.0], None)
        .with_variable(FLASH_LON_FIELD, vec![1.0], None);
    let opener = MemoryOpener::new()
        .with_file("ISS_LIS_A.nc", flash_file(0.0, 10.0, &[(1.0, 1.0)]))
        .with_file("ISS_LIS_B.nc", bad);

    let err = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc", "ISS_LIS_B.nc"]))
        .unwrap_err();

    match &err {
        FlashLocError::DataFormat { path, field, reason } => {
            assert_eq!(path, &PathBuf::from("/data/ISS_LIS_B.nc"));
            assert_eq!(field.as_deref(), Some(FLASH_LON_FIELD));
            assert!(reason.contains("2 values"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rejected_file_leaves_builder_unchanged() {
    let mut builder = AggregationBuilder::new();
    builder
        .push(FlashFile {
            path: PathBuf::from("a.nc"),
            orbit_start: TimeField { values: vec![0.0], units: UNITS.into() },
            orbit_end: TimeField { values: vec![1.0], units: UNITS.into() },
            flash_lat: vec![1.0],
            flash_lon: vec![2.0],
        })
        .unwrap();

    let rejected = builder.push(FlashFile {
        path: PathBuf::from("b.nc"),
        orbit_start: TimeField { values: vec![0.0], units: "parsecs since 1993-01-01".into() },
        orbit_end: TimeField { values: vec![1.0], units: UNITS.into() },
        flash_lat: vec![3.0],
        flash_lon: vec![4.0],
    });

    assert!(rejected.is_err());
    assert_eq!(builder.flash_count(), 1);
    let result = builder.finish().unwrap();
    assert_eq!(result.sources().len(), 1);
}

#[test]
fn test_missing_time_field_aborts() {
    let opener = MemoryOpener::new().with_file(
        "ISS_LIS_A.nc",
        flash_file(0.0, 10.0, &[]).without_variable(ORBIT_START_FIELD),
    );

    let err = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap_err();
    assert!(err.to_string().contains(ORBIT_START_FIELD));
}

#[test]
fn test_bad_units_abort() {
    let file = flash_file(0.0, 10.0, &[]).with_variable(
        ORBIT_END_FIELD,
        vec![10.0],
        Some("seconds after launch"),
    );
    let opener = MemoryOpener::new().with_file("ISS_LIS_A.nc", file);

    let err = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap_err();
    assert!(matches!(err, FlashLocError::DataFormat { .. }));
    assert!(err.to_string().contains(ORBIT_END_FIELD));
}

#[test]
fn test_unopenable_file_aborts() {
    let err = FlashAggregator::new(MemoryOpener::new())
        .aggregate(&paths(&["ISS_LIS_missing.nc"]))
        .unwrap_err();
    assert!(matches!(err, FlashLocError::DataFormat { field: None, .. }));
}

#[test]
fn test_end_before_start_rejected() {
    let opener = MemoryOpener::new().with_file("ISS_LIS_A.nc", flash_file(DAY, 0.0, &[]));
    let err = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap_err();
    assert!(err.to_string().contains("before it starts"));
}

#[test]
fn test_files_without_any_orbit_times_rejected() {
    let file = MemoryFile::new()
        .with_variable(ORBIT_START_FIELD, vec![], Some(UNITS))
        .with_variable(ORBIT_END_FIELD, vec![], Some(UNITS))
        .with_variable(FLASH_LAT_FIELD, vec![1.0], None)
        .with_variable(FLASH_LON_FIELD, vec![1.0], None);
    let opener = MemoryOpener::new().with_file("ISS_LIS_A.nc", file);

    let err = FlashAggregator::new(opener)
        .aggregate(&paths(&["ISS_LIS_A.nc"]))
        .unwrap_err();
    assert!(err.to_string().contains("no orbit start/end times"));
}

// ==================== Properties ====================

fn arb_file() -> impl Strategy<Value = (f64, f64, Vec<(f64, f64)>)> {
    (
        0.0..1.0e8f64,
        0.0..1.0e6f64,
        prop::collection::vec((-90.0..90.0f64, -180.0..180.0f64), 0..20),
    )
        .prop_map(|(start, duration, flashes)| (start, start + duration, flashes))
}

fn opener_for(files: &[(f64, f64, Vec<(f64, f64)>)]) -> (MemoryOpener, Vec<PathBuf>) {
    let mut opener = MemoryOpener::new();
    let mut names = Vec::new();
    for (i, (start, end, flashes)) in files.iter().enumerate() {
        let name = format!("ISS_LIS_{i:03}.nc");
        opener = opener.with_file(&name, flash_file(*start, *end, flashes));
        names.push(PathBuf::from(name));
    }
    (opener, names)
}

proptest! {
    #[test]
    fn prop_lengths_and_order(files in prop::collection::vec(arb_file(), 1..8)) {
        let (opener, names) = opener_for(&files);
        let result = FlashAggregator::new(opener).aggregate(&names).unwrap();

        let expected: Vec<(f64, f64)> = files.iter().flat_map(|(_, _, f)| f.clone()).collect();
        prop_assert_eq!(result.lat().len(), result.lon().len());
        prop_assert_eq!(result.len(), expected.len());
        let actual: Vec<(f64, f64)> = result.records().map(|r| (r.lat, r.lon)).collect();
        prop_assert_eq!(actual, expected);

        let range = result.date_range().unwrap();
        prop_assert!(range.begin() <= range.end());
    }

    #[test]
    fn prop_date_range_independent_of_order(files in prop::collection::vec(arb_file(), 1..8)) {
        let (opener, names) = opener_for(&files);
        let mut reversed = names.clone();
        reversed.reverse();

        let aggregator = FlashAggregator::new(opener);
        let forward = aggregator.aggregate(&names).unwrap();
        let backward = aggregator.aggregate(&reversed).unwrap();

        prop_assert_eq!(forward.date_range(), backward.date_range());
    }
}
