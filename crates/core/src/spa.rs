//! Spa service validation and booking report aggregation.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::appointment::BookingStatus;
use crate::error::CoreError;
use crate::types::{Cents, DbId, Timestamp};

/// Number of services listed in a report's `popular_services`.
pub const POPULAR_SERVICES_LIMIT: usize = 5;

/// Reporting window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(CoreError::Validation(format!(
                "Invalid report period '{other}'. Must be one of: week, month, year"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Start of the window that ends at `now`.
    pub fn start(self, now: Timestamp) -> Timestamp {
        let days = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        };
        now - Duration::days(days)
    }
}

pub fn validate_service(duration_mins: i32, price_cents: Cents) -> Result<(), CoreError> {
    if duration_mins <= 0 {
        return Err(CoreError::Validation(
            "Service duration must be positive".into(),
        ));
    }
    if price_cents < 0 {
        return Err(CoreError::Validation("Price must not be negative".into()));
    }
    Ok(())
}

/// The subset of a booking row the report needs.
#[derive(Debug, Clone)]
pub struct BookingFact {
    pub service_id: DbId,
    pub service_name: String,
    pub status: String,
    pub price_cents: Cents,
    pub is_free_session: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PopularService {
    pub service_id: DbId,
    pub name: String,
    pub bookings: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpaReport {
    pub period: &'static str,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub completed_bookings: i64,
    pub cancelled_bookings: i64,
    /// Sum of prices of confirmed and completed bookings.
    pub total_revenue_cents: Cents,
    pub free_sessions_used: i64,
    pub popular_services: Vec<PopularService>,
}

/// Aggregate booking facts for `period` into a report.
///
/// Cancelled bookings count toward totals and popularity but not revenue or
/// free-session usage.
pub fn build_report(period: ReportPeriod, bookings: &[BookingFact]) -> SpaReport {
    let mut report = SpaReport {
        period: period.name(),
        total_bookings: bookings.len() as i64,
        pending_bookings: 0,
        confirmed_bookings: 0,
        completed_bookings: 0,
        cancelled_bookings: 0,
        total_revenue_cents: 0,
        free_sessions_used: 0,
        popular_services: Vec::new(),
    };

    let mut by_service: HashMap<DbId, (String, i64)> = HashMap::new();

    for b in bookings {
        let status = BookingStatus::from_name(&b.status).unwrap_or(BookingStatus::Pending);
        match status {
            BookingStatus::Pending => report.pending_bookings += 1,
            BookingStatus::Confirmed => report.confirmed_bookings += 1,
            BookingStatus::Completed => report.completed_bookings += 1,
            BookingStatus::Cancelled => report.cancelled_bookings += 1,
        }
        if matches!(status, BookingStatus::Confirmed | BookingStatus::Completed) {
            report.total_revenue_cents += b.price_cents;
        }
        if b.is_free_session && status != BookingStatus::Cancelled {
            report.free_sessions_used += 1;
        }
        by_service
            .entry(b.service_id)
            .or_insert_with(|| (b.service_name.clone(), 0))
            .1 += 1;
    }

    let mut popular: Vec<PopularService> = by_service
        .into_iter()
        .map(|(service_id, (name, bookings))| PopularService {
            service_id,
            name,
            bookings,
        })
        .collect();
    // Most booked first; ties broken by id for a stable order.
    popular.sort_by(|a, b| b.bookings.cmp(&a.bookings).then(a.service_id.cmp(&b.service_id)));
    popular.truncate(POPULAR_SERVICES_LIMIT);
    report.popular_services = popular;

    report
}
