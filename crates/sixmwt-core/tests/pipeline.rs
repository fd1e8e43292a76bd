mod common;

use common::{assert_close, fixture_table, table};
use sixmwt_core::aggregates::Bucket;
use sixmwt_core::boundaries::MarkerScheme;
use sixmwt_core::channels::{ChannelProfile, RatioChannel};
use sixmwt_core::config::ExtractionConfig;
use sixmwt_core::values::mean;
use sixmwt_core::{build_subject_record, ExtractionError};

#[test]
fn builds_record_from_start_scheme_export() {
    let table = fixture_table("walk_start_scheme.xml");
    let record = build_subject_record("rossi.xml", &table, &ExtractionConfig::default())
        .expect("record");

    assert_eq!(record.source(), "rossi.xml");
    assert_eq!(record.surname(), "Rossi");
    assert_eq!(record.name(), "Maria");
    assert_eq!(record.scheme(), MarkerScheme::Start);
    assert_eq!(record.marker_column(), 2);
    assert_eq!(record.timestamps()[1], "00:01:00");
    assert_eq!(record.channels().len(), 17);

    let vo2 = record.channel("V'O2").expect("V'O2 channel");
    let expected = [1200.0, 1600.0, 2000.0, 2400.0, 2800.0, 3200.0];
    for (actual, expected) in vo2.intervals().iter().zip(expected) {
        assert_close(*actual, expected);
    }
    assert_close(vo2.aggregates().third1, 1400.0);
    assert_close(vo2.aggregates().half2, 2800.0);
    assert_close(vo2.aggregates().total, 2200.0);

    let ve = record.channel("V'E").expect("V'E channel");
    assert_close(ve.intervals()[0], 32.0);
    assert_close(ve.intervals()[1], 36.0);

    let per_kg = record.channel("V'O2/kg").expect("V'O2/kg channel");
    assert_close(per_kg.intervals()[2], 24.0);

    let rer = record.channel("RER").expect("RER channel");
    assert!(rer.intervals().iter().all(Option::is_none));
    assert_eq!(rer.aggregates().total, None);

    assert_close(record.kinematics().total_distance, 900.0);
    assert_close(record.kinematics().total_speed_kmh, 9.0);
}

#[test]
fn spreadsheet_and_delimited_exports_give_the_same_record() {
    let config = ExtractionConfig::default();
    let from_xml = build_subject_record("walk", &fixture_table("walk_start_scheme.xml"), &config)
        .expect("xml record");
    let from_csv = build_subject_record("walk", &fixture_table("walk_start_scheme.csv"), &config)
        .expect("csv record");

    assert_eq!(from_xml, from_csv);
}

#[test]
fn building_twice_gives_identical_records() {
    let table = fixture_table("walk_marker_scheme.csv");
    let config = ExtractionConfig::default();

    let first = build_subject_record("b.csv", &table, &config).expect("first");
    let second = build_subject_record("b.csv", &table, &config).expect("second");

    assert_eq!(first, second);
}

#[test]
fn marker_scheme_derives_ratio_from_aggregates() {
    let table = fixture_table("walk_marker_scheme.csv");
    let record =
        build_subject_record("b.csv", &table, &ExtractionConfig::default()).expect("record");

    assert_eq!(record.surname(), "Bianchi");
    assert_eq!(record.scheme(), MarkerScheme::Marker);
    assert_eq!(record.channels().len(), 19);

    let ratio = record.channels().last().expect("ratio channel");
    assert_eq!(ratio.name(), "V'E/V'O2");
    assert!(ratio.is_derived());

    let ve = record.channel("V'E").expect("V'E");
    let vo2 = record.channel("V'O2").expect("V'O2");
    assert_close(ratio.intervals()[0], 0.02);
    assert_close(ratio.intervals()[1], 0.028);

    for bucket in Bucket::ALL {
        let expected = ve.aggregates().get(bucket).expect("V'E aggregate")
            / vo2.aggregates().get(bucket).expect("V'O2 aggregate");
        assert_close(ratio.aggregates().get(bucket), expected);
    }

    let mean_of_ratios = mean(ratio.intervals().iter().copied()).expect("ratios");
    let total = ratio.aggregates().total.expect("ratio total");
    assert!((total - mean_of_ratios).abs() > 1e-4);
}

#[test]
fn ratio_with_zero_denominator_is_null() {
    let table = table(&[
        &["t", "", "MARKER", "num", "den"],
        &["0", "", "START", "5", "0"],
        &["1", "", "1", "5", "0"],
        &["2", "", "2", "5", "0"],
        &["3", "", "3", "5", "0"],
        &["4", "", "4", "5", "0"],
        &["5", "", "5", "5", "0"],
        &["6", "", "6", "5", "0"],
    ]);
    let profile = ChannelProfile {
        channels: vec!["num".to_string(), "den".to_string()],
        ratios: vec![RatioChannel::new("num/den", "num", "den")],
    };
    let config = ExtractionConfig::default()
        .with_profile(MarkerScheme::Marker, profile)
        .expect("valid profile");
    let record = build_subject_record("zero", &table, &config).expect("record");

    let ratio = record.channel("num/den").expect("ratio");
    assert!(ratio.intervals().iter().all(Option::is_none));
    assert_eq!(ratio.aggregates().total, None);
}

#[test]
fn table_without_marker_column_fails() {
    let table = table(&[&["Cognome", "Rossi"], &["t", "Fase", "Evento"]]);
    let err = build_subject_record("x", &table, &ExtractionConfig::default())
        .expect_err("no marker column");

    assert!(matches!(err, ExtractionError::Configuration { .. }));
}
