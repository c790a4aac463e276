mod common;

use common::{FakeSource, Reply, range, records};
use serde_json::{Value, json};
use storeboard_reporting::{
    FallbackReason, PipelineOutcome, ReportingConfig, SalesSeries, SeriesRequest, SeriesSource,
};
use storeboard_shared_models::{ReportPeriod, TimeSeriesPoint};

fn weekly_march() -> SeriesRequest {
    SeriesRequest::new(ReportPeriod::Weekly, range((2024, 2, 20), (2024, 3, 10)))
}

fn march_orders() -> Vec<Value> {
    records(json!([
        {"createdAt": "2024-03-01", "totalAmount": 100},
        {"createdAt": "2024-03-01", "totalAmount": 50},
        {"createdAt": "2024-03-08", "totalAmount": 200}
    ]))
}

fn point(period: &str, revenue: f64, orders: u64) -> TimeSeriesPoint {
    TimeSeriesPoint {
        period: period.to_string(),
        revenue,
        orders,
    }
}

#[tokio::test]
async fn labeled_analytics_are_used_directly() {
    let source = FakeSource::new(
        Reply::Records(records(json!([
            {"startDate": "2024-03-03", "totalRevenue": 200, "orderCount": 1},
            {"startDate": "2024-02-25", "totalRevenue": 150, "orderCount": 2}
        ]))),
        Reply::Records(march_orders()),
    );
    let series = SalesSeries::new(source.clone(), ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::Analytics);
    assert_eq!(
        report.points,
        vec![point("Week of Feb 25", 150.0, 2), point("Week of Mar 3", 200.0, 1)]
    );
    assert_eq!(source.calls(), vec!["analytics:week"]);
}

#[tokio::test]
async fn remote_failure_falls_back_to_orders() {
    let source = FakeSource::new(Reply::Fail(502), Reply::Records(march_orders()));
    let series = SalesSeries::new(source.clone(), ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::ClientAggregation);
    assert_eq!(
        report.points,
        vec![point("Week of Feb 25", 150.0, 2), point("Week of Mar 3", 200.0, 1)]
    );
    assert_eq!(source.calls(), vec!["analytics:week", "orders:1:1000"]);
}

#[tokio::test]
async fn unlabeled_analytics_trigger_fallback() {
    let source = FakeSource::new(
        Reply::Records(records(json!([{"period": null, "revenue": 500, "orders": 3}]))),
        Reply::Records(march_orders()),
    );
    let series = SalesSeries::new(source.clone(), ReportingConfig::default());

    assert_eq!(
        series.remote_stage(&weekly_march()).await,
        PipelineOutcome::NeedsFallback(FallbackReason::UnusableShape { records: 1 })
    );

    let report = series.fetch(&weekly_march()).await;
    assert_eq!(report.source, SeriesSource::ClientAggregation);
    assert!(report.points.iter().all(|p| p.period != "Unknown"));
    assert_eq!(report.points.iter().map(|p| p.orders).sum::<u64>(), 3);
}

#[tokio::test]
async fn empty_analytics_is_no_data_not_a_fallback() {
    let source = FakeSource::new(Reply::Records(Vec::new()), Reply::Records(march_orders()));
    let series = SalesSeries::new(source.clone(), ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::Analytics);
    assert!(report.is_empty());
    assert_eq!(source.order_calls(), 0);
}

#[tokio::test]
async fn both_stages_failing_yields_an_empty_series() {
    let source = FakeSource::new(Reply::Fail(500), Reply::Fail(503));
    let series = SalesSeries::new(source, ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::Unavailable);
    assert!(report.points.is_empty());
    assert_eq!(report.request, weekly_march());
}

#[tokio::test]
async fn no_orders_in_range_is_an_empty_series() {
    let source = FakeSource::new(
        Reply::Fail(500),
        Reply::Records(records(json!([{"createdAt": "2023-01-01", "total": 10}]))),
    );
    let series = SalesSeries::new(source, ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::ClientAggregation);
    assert!(report.points.is_empty());
}

#[tokio::test(start_paused = true)]
async fn hung_analytics_times_out_into_fallback() {
    let source = FakeSource::new(Reply::Hang, Reply::Records(march_orders()));
    let series = SalesSeries::new(source, ReportingConfig::default());

    assert!(matches!(
        series.remote_stage(&weekly_march()).await,
        PipelineOutcome::NeedsFallback(FallbackReason::TimedOut(_))
    ));

    let report = series.fetch(&weekly_march()).await;
    assert_eq!(report.source, SeriesSource::ClientAggregation);
    assert_eq!(report.points.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn hung_order_listing_yields_an_empty_series() {
    let source = FakeSource::new(Reply::Fail(500), Reply::Hang);
    let series = SalesSeries::new(source, ReportingConfig::default());

    let report = series.fetch(&weekly_march()).await;

    assert_eq!(report.source, SeriesSource::Unavailable);
    assert!(report.points.is_empty());
}

#[tokio::test]
async fn fetches_are_idempotent() {
    let source = FakeSource::new(Reply::Fail(500), Reply::Records(march_orders()));
    let series = SalesSeries::new(source, ReportingConfig::default());

    let first = series.fetch(&weekly_march()).await;
    let second = series.fetch(&weekly_march()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn every_order_in_range_is_counted_once() {
    // 90 orders spread over three months, a third of them outside the window.
    let orders: Vec<Value> = (0..90)
        .map(|i| {
            let month = 1 + i % 3;
            let day = 1 + (i * 7) % 28;
            json!({
                "createdAt": format!("2024-{month:02}-{day:02}T12:00:00Z"),
                "total": i,
            })
        })
        .collect();
    let request = SeriesRequest::new(ReportPeriod::Daily, range((2024, 1, 1), (2024, 2, 29)));

    let in_range: Vec<&Value> = orders
        .iter()
        .filter(|o| !o["createdAt"].as_str().unwrap().starts_with("2024-03"))
        .collect();
    let expected_revenue: f64 = in_range.iter().map(|o| o["total"].as_f64().unwrap()).sum();

    for period in [ReportPeriod::Daily, ReportPeriod::Weekly, ReportPeriod::Monthly] {
        let source = FakeSource::new(Reply::Fail(500), Reply::Records(orders.clone()));
        let series = SalesSeries::new(source, ReportingConfig::default());
        let report = series
            .fetch(&SeriesRequest::new(period, request.range))
            .await;

        let counted: u64 = report.points.iter().map(|p| p.orders).sum();
        let revenue: f64 = report.points.iter().map(|p| p.revenue).sum();
        assert_eq!(counted as usize, in_range.len(), "{period}");
        assert_eq!(revenue, expected_revenue, "{period}");

        let mut labels: Vec<&str> = report.points.iter().map(|p| p.period.as_str()).collect();
        labels.dedup();
        assert_eq!(labels.len(), report.points.len(), "{period}");
    }
}

#[tokio::test]
async fn orders_are_paged_until_a_short_page() {
    let orders: Vec<Value> = (1..=5)
        .map(|day| json!({"createdAt": format!("2024-03-0{day}"), "total": 1}))
        .collect();
    let source = FakeSource::new(Reply::Fail(500), Reply::Records(orders));
    let config = ReportingConfig {
        orders_page_size: 2,
        orders_max_pages: 10,
        ..ReportingConfig::default()
    };
    let series = SalesSeries::new(source.clone(), config);

    let report = series
        .fetch(&SeriesRequest::new(ReportPeriod::Monthly, range((2024, 3, 1), (2024, 3, 31))))
        .await;

    assert_eq!(report.points, vec![point("Mar 2024", 5.0, 5)]);
    assert_eq!(
        source.calls(),
        vec!["analytics:month", "orders:1:2", "orders:2:2", "orders:3:2"]
    );
}

#[tokio::test]
async fn page_limit_bounds_the_order_window() {
    let orders: Vec<Value> = (1..=5)
        .map(|day| json!({"createdAt": format!("2024-03-0{day}"), "total": 1}))
        .collect();
    let source = FakeSource::new(Reply::Fail(500), Reply::Records(orders));
    let config = ReportingConfig {
        orders_page_size: 2,
        orders_max_pages: 2,
        ..ReportingConfig::default()
    };
    let series = SalesSeries::new(source.clone(), config);

    let report = series
        .fetch(&SeriesRequest::new(ReportPeriod::Monthly, range((2024, 3, 1), (2024, 3, 31))))
        .await;

    assert_eq!(report.points, vec![point("Mar 2024", 4.0, 4)]);
    assert_eq!(source.order_calls(), 2);
}

#[tokio::test]
async fn failing_later_page_makes_the_series_unavailable() {
    let orders: Vec<Value> = (1..=5)
        .map(|day| json!({"createdAt": format!("2024-03-0{day}"), "total": 1}))
        .collect();
    let mut source = FakeSource::new(Reply::Fail(500), Reply::Records(orders));
    source.failing_pages = vec![2];
    let config = ReportingConfig {
        orders_page_size: 2,
        orders_max_pages: 5,
        ..ReportingConfig::default()
    };
    let series = SalesSeries::new(source, config);

    let report = series
        .fetch(&SeriesRequest::new(ReportPeriod::Monthly, range((2024, 3, 1), (2024, 3, 31))))
        .await;

    assert_eq!(report.source, SeriesSource::Unavailable);
    assert!(report.points.is_empty());
}

#[tokio::test]
async fn weekly_series_crosses_the_year_boundary_in_date_order() {
    let source = FakeSource::new(
        Reply::Fail(500),
        Reply::Records(records(json!([
            {"createdAt": "2025-01-07T09:00:00Z", "total": 30},
            {"createdAt": "2024-12-31T09:00:00Z", "total": 20},
            {"createdAt": "2024-12-23T09:00:00Z", "total": 10}
        ]))),
    );
    let series = SalesSeries::new(source, ReportingConfig::default());

    let report = series
        .fetch(&SeriesRequest::new(ReportPeriod::Weekly, range((2024, 12, 1), (2025, 1, 31))))
        .await;

    let labels: Vec<&str> = report.points.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(labels, vec!["Week of Dec 22", "Week of Dec 29", "Week of Jan 5"]);
}
