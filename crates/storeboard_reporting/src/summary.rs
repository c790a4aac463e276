use serde::Serialize;
use storeboard_shared_models::{MetricType, TimeSeriesPoint};

/// Headline numbers shown above the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub average_order_value: Option<f64>,
    /// First bucket holding the highest value of the plotted metric.
    pub peak_period: Option<String>,
}

impl SeriesSummary {
    pub fn from_points(points: &[TimeSeriesPoint], metric: MetricType) -> Self {
        let total_revenue: f64 = points.iter().map(|p| p.revenue).sum();
        let total_orders: u64 = points.iter().map(|p| p.orders).sum();

        let average_order_value = (total_orders > 0).then(|| total_revenue / total_orders as f64);

        let peak_period = points
            .iter()
            .fold(None::<&TimeSeriesPoint>, |best, point| match best {
                Some(b) if metric.value(b) >= metric.value(point) => Some(b),
                _ => Some(point),
            })
            .filter(|p| metric.value(p) > 0.0)
            .map(|p| p.period.clone());

        Self {
            total_revenue,
            total_orders,
            average_order_value,
            peak_period,
        }
    }
}
