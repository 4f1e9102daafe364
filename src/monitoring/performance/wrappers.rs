//! Measuring wrappers around reservation-path operations
//!
//! Each wrapper opens a timer, awaits the operation, records the outcome and
//! hands the operation's result back unchanged. Errors are recorded with
//! their kind and returned as-is.

use super::recorder::PerformanceMonitor;
use super::types::{CACHE_HIT_KEY, Context};
use crate::utils::error::MonitorError;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::future::Future;

/// Short classification of an error, recorded as a failed sample's `error_type`
pub trait ErrorKind {
    fn error_kind(&self) -> String;
}

impl ErrorKind for MonitorError {
    fn error_kind(&self) -> String {
        self.kind().to_string()
    }
}

impl ErrorKind for std::io::Error {
    fn error_kind(&self) -> String {
        format!("{:?}", self.kind())
    }
}

impl ErrorKind for anyhow::Error {
    fn error_kind(&self) -> String {
        match self.downcast_ref::<MonitorError>() {
            Some(err) => err.kind().to_string(),
            None => "Error".to_string(),
        }
    }
}

impl ErrorKind for String {
    fn error_kind(&self) -> String {
        "Error".to_string()
    }
}

fn context_of(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Context {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl PerformanceMonitor {
    /// Time `op` as `operation`, deriving extra context from a successful result
    pub async fn measure<T, E, Fut, F>(
        &self,
        operation: &str,
        context: Context,
        op: Fut,
        on_success: F,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: ErrorKind,
        F: FnOnce(&T) -> Context,
    {
        let timer_id = self.start_timing(operation, context);

        match op.await {
            Ok(value) => {
                let extra = on_success(&value);
                self.end_timing(&timer_id, operation, true, None, Some(extra));
                Ok(value)
            }
            Err(err) => {
                let kind = err.error_kind();
                self.end_timing(&timer_id, operation, false, Some(&kind), None);
                Err(err)
            }
        }
    }

    /// Time a loft search; records the number of results
    pub async fn measure_loft_search<T, E, Fut>(&self, filters: Value, op: Fut) -> Result<Vec<T>, E>
    where
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: ErrorKind,
    {
        self.measure(
            "loft_search",
            context_of([("filters", filters)]),
            op,
            |lofts| context_of([("result_count", json!(lofts.len()))]),
        )
        .await
    }

    /// Time a loft detail lookup; records whether the loft was found
    pub async fn measure_loft_details<T, E, Fut>(&self, loft_id: &str, op: Fut) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<Option<T>, E>>,
        E: ErrorKind,
    {
        self.measure(
            "loft_details",
            context_of([("loft_id", json!(loft_id))]),
            op,
            |loft| context_of([("found", json!(loft.is_some()))]),
        )
        .await
    }

    /// Time an availability check; records the answer
    pub async fn measure_availability_check<E, Fut>(
        &self,
        loft_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        op: Fut,
    ) -> Result<bool, E>
    where
        Fut: Future<Output = Result<bool, E>>,
        E: ErrorKind,
    {
        let nights = (check_out - check_in).num_days();
        self.measure(
            "availability_check",
            context_of([
                ("loft_id", json!(loft_id)),
                ("check_in", json!(check_in.to_string())),
                ("check_out", json!(check_out.to_string())),
                ("nights", json!(nights)),
            ]),
            op,
            |available| context_of([("available", json!(available))]),
        )
        .await
    }

    /// Time a price calculation
    pub async fn measure_pricing_calculation<T, E, Fut>(
        &self,
        loft_id: &str,
        nights: u32,
        op: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: ErrorKind,
    {
        self.measure(
            "pricing_calculation",
            context_of([("loft_id", json!(loft_id)), ("nights", json!(nights))]),
            op,
            |_| Context::new(),
        )
        .await
    }

    /// Time a reservation creation
    pub async fn measure_reservation_creation<T, E, Fut>(
        &self,
        loft_id: &str,
        guest_count: u32,
        op: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: ErrorKind,
    {
        self.measure(
            "reservation_creation",
            context_of([
                ("loft_id", json!(loft_id)),
                ("guest_count", json!(guest_count)),
            ]),
            op,
            |_| Context::new(),
        )
        .await
    }

    /// Time a database query
    pub async fn measure_database_query<T, E, Fut>(
        &self,
        table: &str,
        query: &str,
        op: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: ErrorKind,
    {
        self.measure(
            "database_query",
            context_of([("table", json!(table)), ("query", json!(query))]),
            op,
            |_| Context::new(),
        )
        .await
    }

    /// Time a cache lookup; a `Some` result counts as a hit
    pub async fn measure_cache_lookup<T, E, Fut>(&self, key: &str, op: Fut) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<Option<T>, E>>,
        E: ErrorKind,
    {
        self.measure(
            "cache_lookup",
            context_of([("key", json!(key))]),
            op,
            |hit| context_of([(CACHE_HIT_KEY, json!(hit.is_some()))]),
        )
        .await
    }
}
