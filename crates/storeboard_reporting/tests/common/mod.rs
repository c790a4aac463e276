#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storeboard_api::ApiError;
use storeboard_reporting::ReportingSource;
use storeboard_shared_models::{DateRange, Granularity};

#[derive(Debug, Clone)]
pub enum Reply {
    Records(Vec<Value>),
    Fail(u16),
    Hang,
}

/// In-memory backend. Records every call it receives.
#[derive(Clone)]
pub struct FakeSource {
    pub analytics: Reply,
    pub orders: Reply,
    /// Page numbers (1-based) that fail with a 500.
    pub failing_pages: Vec<u32>,
    pub analytics_delay: HashMap<Granularity, Duration>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    pub fn new(analytics: Reply, orders: Reply) -> Self {
        Self {
            analytics,
            orders,
            failing_pages: Vec::new(),
            analytics_delay: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn order_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("orders")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error(status: u16) -> ApiError {
    ApiError::Http {
        status,
        body: "upstream exploded".to_string(),
    }
}

impl ReportingSource for FakeSource {
    async fn order_analytics(
        &self,
        _range: &DateRange,
        granularity: Granularity,
    ) -> Result<Vec<Value>, ApiError> {
        self.record(format!("analytics:{granularity}"));
        if let Some(delay) = self.analytics_delay.get(&granularity).copied() {
            tokio::time::sleep(delay).await;
        }

        match self.analytics.clone() {
            Reply::Records(records) => Ok(records),
            Reply::Fail(status) => Err(server_error(status)),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
        }
    }

    async fn list_orders(&self, page: u32, page_size: u32) -> Result<Vec<Value>, ApiError> {
        self.record(format!("orders:{page}:{page_size}"));
        if self.failing_pages.contains(&page) {
            return Err(server_error(500));
        }

        match self.orders.clone() {
            Reply::Records(orders) => Ok(orders
                .into_iter()
                .skip(((page - 1) * page_size) as usize)
                .take(page_size as usize)
                .collect()),
            Reply::Fail(status) => Err(server_error(status)),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Ok(Vec::new())
            }
        }
    }
}

pub fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> DateRange {
    DateRange::new(
        Utc.with_ymd_and_hms(from.0, from.1, from.2, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(to.0, to.1, to.2, 23, 59, 59).unwrap(),
    )
}

pub fn records(value: Value) -> Vec<Value> {
    value.as_array().cloned().expect("array fixture")
}
