use chrono::{TimeZone, Utc};

use super::common::{agriculture_venture, engine, record, snapshot};
use crate::scoring::domain::Venture;
use crate::scoring::GedsiStrategy;

#[test]
fn scoring_is_idempotent() {
    let snapshot = snapshot(
        agriculture_venture(),
        vec![record(40.0, 50.0), record(10.0, 100.0)],
    );
    let engine = engine();
    assert_eq!(engine.score(&snapshot), engine.score(&snapshot));
}

#[test]
fn materialize_copies_every_field() {
    let snapshot = snapshot(agriculture_venture(), vec![record(90.0, 100.0)]);
    let score = engine().score(&snapshot);
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

    let fields = score.materialize(at);
    assert_eq!(fields.gedsi_score, 90);
    assert_eq!(fields.gedsi_compliance_rate, 100);
    assert_eq!(fields.social_impact_score, score.social_impact_score);
    assert_eq!(fields.total_beneficiaries, 1300);
    assert_eq!(fields.women_empowered, 650);
    assert_eq!(fields.calculated_at, Some(at));
    assert_eq!(score.gedsi_source, GedsiStrategy::MetricRatioAverage);
}

#[test]
fn scores_stay_in_range_across_varied_inputs() {
    let engine = engine();
    let sectors = [None, Some("Agriculture"), Some("Fintech"), Some("unknown")];
    let fundings = [None, Some(-5.0), Some(1.0), Some(5_000_000.0), Some(f64::INFINITY)];
    let overrides = [None, Some(r#"{"gedsiScore": -20}"#), Some(r#"{"gedsiScore": 1e9}"#)];

    for sector in sectors {
        for funding in fundings {
            for score_override in overrides {
                let mut venture = Venture::new("v-range", "Range");
                venture.sector = sector.map(str::to_string);
                venture.funding_raised = funding;
                venture.team_size = Some(250);
                venture.founder_types = Some(r#"["women-led","youth-led"]"#.to_string());
                venture.score_override = score_override.map(str::to_string);
                let metrics = vec![record(1e12, 1.0), record(-3.0, 4.0)];

                let score = engine.score(&snapshot(venture, metrics));
                assert!(score.gedsi_score <= 100);
                assert!(score.social_impact_score <= 100);
                assert!(score.gedsi_compliance_rate <= 100);
            }
        }
    }
}
