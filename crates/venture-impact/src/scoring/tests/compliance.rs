use super::common::record;
use crate::scoring::compute_gedsi_compliance_rate;

#[test]
fn empty_records_yield_zero() {
    assert_eq!(compute_gedsi_compliance_rate(&[]), 0);
}

#[test]
fn counts_records_at_or_above_eighty_percent() {
    let records = vec![
        record(80.0, 100.0),
        record(79.0, 100.0),
        record(5.0, 0.0),
        record(200.0, 100.0),
    ];
    assert_eq!(compute_gedsi_compliance_rate(&records), 50);
}

#[test]
fn rounds_to_nearest_percent() {
    let one_of_three = vec![record(90.0, 100.0), record(10.0, 100.0), record(0.0, 100.0)];
    assert_eq!(compute_gedsi_compliance_rate(&one_of_three), 33);

    let two_of_three = vec![record(90.0, 100.0), record(85.0, 100.0), record(0.0, 100.0)];
    assert_eq!(compute_gedsi_compliance_rate(&two_of_three), 67);
}

#[test]
fn non_positive_targets_never_comply() {
    let records = vec![record(10.0, -5.0), record(0.0, 0.0), record(f64::NAN, 10.0)];
    assert_eq!(compute_gedsi_compliance_rate(&records), 0);
}
