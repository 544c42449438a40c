use vardate::{date_difference, DiffUnit, Precision, Temporal, TemporalError, VarDate};

#[test]
fn end_to_end_parse_format_scenario() {
    // The canonical time separator is `T`; a space is rejected outright.
    assert!("2014-12-04 15:22:23.123456789".parse::<VarDate>().is_err());

    let v: VarDate = "2014-12-04T15:22:23.123456789".parse().unwrap();
    assert_eq!(v.year(), 2014);
    assert_eq!(v.month().unwrap(), 12);
    assert_eq!(v.day().unwrap(), 4);
    assert_eq!(v.hour().unwrap(), 15);
    assert_eq!(v.minute().unwrap(), 22);
    assert_eq!(v.second().unwrap(), 23);
    assert_eq!(v.subsec().unwrap(), "123456789");
    assert_eq!(v.format("yyyy-MM-dd").unwrap(), "2014-12-04");
}

#[test]
fn canonical_text_roundtrips_at_every_precision() {
    for text in [
        "2020",
        "2020-02",
        "2020-02-29",
        "2020-02-29T23",
        "2020-02-29T23:59",
        "2020-02-29T23:59:59",
        "2020-02-29T23:59:59.500",
    ] {
        let v: VarDate = text.parse().unwrap();
        assert_eq!(v.to_string(), text);
        assert_eq!(v.to_string().parse::<VarDate>().unwrap(), v);
    }
}

#[test]
fn arithmetic_comparison_and_difference_compose() {
    let start: VarDate = "2020-02-29T12:00:00.500".parse().unwrap();

    let shifted = start
        .add_years(1)
        .unwrap()
        .add_months(1)
        .unwrap()
        .add_days(3)
        .unwrap();
    assert_eq!(shifted.to_string(), "2021-03-31T12:00:00.500");

    assert!(start < shifted);
    assert_eq!(
        date_difference(&start, &shifted, DiffUnit::Months).unwrap(),
        13
    );
    assert_eq!(
        date_difference(&shifted, &start, DiffUnit::Months).unwrap(),
        -13
    );
}

#[test]
fn offset_inputs_compare_on_the_utc_axis() {
    let utc: VarDate = "2020-06-15T10:00".parse().unwrap();
    let local: VarDate = "2020-06-15T12:00+0200".parse().unwrap();
    assert_eq!(utc, local);
    assert_eq!(
        date_difference(&utc, &local, DiffUnit::Minutes).unwrap(),
        0
    );
}

#[test]
fn latest_marker_flows_through_the_temporal_surface() {
    let latest: Temporal = "%latest".parse().unwrap();
    let concrete: Temporal = "2020-01-01".parse().unwrap();

    assert!(latest.is_latest());
    assert_eq!(latest.to_string(), "%latest");
    assert_eq!(latest.year().unwrap_err(), TemporalError::LatestMarker);
    assert_eq!(
        latest.add_days(1).unwrap_err(),
        TemporalError::LatestMarker
    );
    assert_eq!(
        latest.format("yyyy").unwrap_err(),
        TemporalError::LatestMarker
    );
    assert_eq!(
        latest.difference(&concrete, DiffUnit::Days).unwrap_err(),
        TemporalError::LatestMarker
    );

    assert_eq!(concrete.precision().unwrap(), Precision::Day);
    assert_eq!(concrete.format("yyyy/MM/dd").unwrap(), "2020/01/01");
}

#[test]
fn zoned_formatting_round_trip() {
    // 2020-01-01T03:00 UTC is still New Year's Eve in New York (EST, −5).
    let v: VarDate = "2020-01-01T03:00:00".parse().unwrap();
    assert_eq!(
        v.format("[America/New_York]yyyy-MM-dd\"T\"HH:mm:ss z")
            .unwrap(),
        "2019-12-31T22:00:00 EST"
    );
    // Feeding the shifted wall clock back with its offset restores the value.
    let back: VarDate = "2019-12-31T22:00:00-0500".parse().unwrap();
    assert_eq!(back.to_string(), "2020-01-01T03:00:00");
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trips_both_variants() {
    let v: Temporal = "2020-02-29T23:59:59.500".parse().unwrap();
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "\"2020-02-29T23:59:59.500\"");
    assert_eq!(serde_json::from_str::<Temporal>(&json).unwrap(), v);

    let latest = serde_json::to_string(&Temporal::Latest).unwrap();
    assert_eq!(latest, "\"%latest\"");
    assert!(serde_json::from_str::<Temporal>(&latest).unwrap().is_latest());
}
