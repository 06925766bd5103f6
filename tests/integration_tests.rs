use chrono::{DateTime, TimeZone, Utc};
use survey_insights::analyzers::analyzer::SurveyAnalytics;
use survey_insights::analyzers::filter::{DateWindow, SegmentFilter};
use survey_insights::analyzers::types::TrendClassification;
use survey_insights::config::AnalyticsConfig;
use survey_insights::output::{MetricsRecord, append_record};
use survey_insights::parser::{parse_database, parse_responses};
use survey_insights::survey::{Question, QuestionSet};
use survey_insights::report::build_report;
use survey_insights::store::ResponseStore;

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

fn analytics() -> (ResponseStore, SurveyAnalytics) {
    let bytes = include_bytes!("fixtures/db.json");
    let db = parse_database(bytes).expect("Failed to parse fixture");
    let store = ResponseStore::new(db.responses);
    let questions = AnalyticsConfig::default().question_set(db.questions);

    let mut analytics = SurveyAnalytics::new(store.snapshot(), questions);
    analytics.pin_reference_time(Some(reference_time()));
    (store, analytics)
}

#[test]
fn test_fixture_skips_malformed_records() {
    let (store, analytics) = analytics();
    assert_eq!(store.len(), 6);
    assert_eq!(analytics.questions().len(), 3);
}

#[test]
fn test_full_pipeline_all_responses() {
    let (_, analytics) = analytics();
    let metrics = analytics.metrics();

    assert_eq!(metrics.total_responses, 6);
    assert_eq!(metrics.average_rating, 3.1);

    let buckets: Vec<usize> = metrics.distribution.values().copied().collect();
    assert_eq!(buckets, [1, 1, 1, 1, 1]);
    assert!(metrics.distributed() <= metrics.total_responses);

    assert_eq!(metrics.nps.promoters, 3);
    assert_eq!(metrics.nps.passives, 1);
    assert_eq!(metrics.nps.detractors, 2);
    assert_eq!(metrics.nps.nps_score, 17);
    assert!((-100..=100).contains(&metrics.nps.nps_score));

    assert_eq!(metrics.question_average("puntualidad"), Some(3.0));
    assert_eq!(metrics.question_average("trato"), Some(10.0 / 3.0));

    let emergencia = &metrics.responses_by_service["emergencia"];
    assert_eq!(emergencia.count, 3);
    assert_eq!(emergencia.rated, 2);
    assert_eq!(emergencia.average_rating, 4.0);

    assert_eq!(metrics.trend, TrendClassification::Improving);
}

#[test]
fn test_windows_and_segments() {
    let (_, mut analytics) = analytics();

    analytics.set_date_filter(DateWindow::Last7Days);
    assert_eq!(analytics.metrics().total_responses, 2);
    assert_eq!(analytics.metrics().average_rating, 4.5);

    analytics.set_date_filter(DateWindow::Last30Days);
    analytics.set_segment_filter(SegmentFilter::from_key("familiar"));
    let ids: Vec<&str> = analytics.filtered().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);

    analytics.set_segment_filter(SegmentFilter::from_key("pyme"));
    assert!(!analytics.has_responses());
    assert_eq!(analytics.metrics().nps.nps_score, 0);
}

#[test]
fn test_widening_window_never_decreases_total() {
    let (_, mut analytics) = analytics();

    for segment in ["all", "familiar", "corporativo"] {
        analytics.set_segment_filter(SegmentFilter::from_key(segment));
        let mut previous = 0;
        for window in ["last7days", "last30days", "last3months", "all"] {
            analytics.set_date_filter(DateWindow::from_key(window));
            let total = analytics.metrics().total_responses;
            assert!(total >= previous, "{segment}/{window}: {total} < {previous}");
            previous = total;
        }
    }
}

#[test]
fn test_monthly_trend() {
    let (_, analytics) = analytics();
    let trend = analytics.trend();

    let summary: Vec<(&str, usize, f64)> = trend
        .periods
        .iter()
        .map(|p| (p.period.as_str(), p.responses, p.average))
        .collect();
    assert_eq!(
        summary,
        [
            ("2026-01", 0, 0.0),
            ("2026-02", 0, 0.0),
            ("2026-03", 1, 1.4),
            ("2026-04", 1, 2.0),
            ("2026-05", 1, 3.0),
            ("2026-06", 2, 4.5),
        ]
    );
    assert_eq!(trend.classification, TrendClassification::Improving);
}

#[test]
fn test_store_mutation_refreshes_view() {
    let (mut store, mut analytics) = analytics();
    assert_eq!(analytics.metrics().total_responses, 6);

    analytics.set_dataset(store.remove("6"));
    assert_eq!(analytics.metrics().total_responses, 5);
    assert_eq!(analytics.metrics().nps.nps_score, 0);
}

#[test]
fn test_report_and_csv_output() {
    let (_, mut analytics) = analytics();
    analytics.set_date_filter(DateWindow::Last3Months);

    let report = build_report(&analytics);
    assert!(report.contains("Window `last3months`, segment `all`"));
    assert!(report.contains("- Responses: 4"));

    let path = std::env::temp_dir().join("survey_insights_integration.csv");
    let path = path.to_str().unwrap().to_string();
    let _ = std::fs::remove_file(&path);

    append_record(&path, &MetricsRecord::from_analytics(&analytics)).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains(",last3months,all,4,3.5,"));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_partial_records_count_in_unfiltered_view() {
    let bytes = br#"[
        {"id": "1", "timestamp": "2026-06-14T08:00:00Z", "serviceType": "emergencia",
         "ratings": {"recomendacion": 5}, "average": 5},
        {"id": "2", "timestamp": "2026-06-13T09:30:00", "segment": "familiar",
         "serviceType": "traslado", "ratings": {"recomendacion": 3.5}, "average": 4},
        {"id": "3", "timestamp": "2026-06-12", "segment": "familiar",
         "serviceType": "traslado", "average": 3},
        {"id": "4", "timestamp": "2026-06-11T10:00:00.123+02:00", "segment": "familiar",
         "average": 2},
        {"id": "5", "segment": "familiar", "serviceType": "emergencia", "average": 1}
    ]"#;
    let responses = parse_responses(bytes).expect("Failed to parse responses");
    let questions = QuestionSet::new(
        vec![Question::new("recomendacion", "¿Recomendaría nuestro servicio?")],
        "recomendacion",
    );

    let mut analytics = SurveyAnalytics::new(responses.into(), questions);
    analytics.pin_reference_time(Some(reference_time()));

    let metrics = analytics.metrics();
    assert_eq!(metrics.total_responses, 5);
    assert_eq!(metrics.average_rating, 3.0);
    let buckets: Vec<usize> = metrics.distribution.values().copied().collect();
    assert_eq!(buckets, [1, 1, 1, 1, 1]);
    assert_eq!(metrics.nps.total_rated, 1);
    assert_eq!(metrics.responses_by_service[""].count, 1);

    analytics.set_date_filter(DateWindow::Last7Days);
    assert_eq!(analytics.metrics().total_responses, 4);

    analytics.set_date_filter(DateWindow::All);
    analytics.set_segment_filter(SegmentFilter::from_key("familiar"));
    let ids: Vec<&str> = analytics.filtered().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["2", "3", "4", "5"]);

    let dated: usize = analytics.trend().periods.iter().map(|p| p.responses).sum();
    assert_eq!(dated, 3);
}
