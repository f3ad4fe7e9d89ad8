//! Report Service
//!
//! Shop-wide summary figures computed from the bookkeeping, order and rating
//! collections.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::record_service::{RecordError, RecordService};
use crate::application::dto::ReportSummary;
use crate::domain::{Expense, OrderState, Rating, Revenue, ServiceOrder};

pub struct ReportService {
    records: RecordService,
}

impl ReportService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub async fn summary(&self) -> Result<ReportSummary, RecordError> {
        let (revenues, expenses, orders, ratings) = tokio::try_join!(
            self.records.list_typed::<Revenue>(&[]),
            self.records.list_typed::<Expense>(&[]),
            self.records.list_typed::<ServiceOrder>(&[]),
            self.records.list_typed::<Rating>(&[]),
        )?;

        Ok(summarize(&revenues, &expenses, &orders, &ratings))
    }
}

pub fn summarize(
    revenues: &[Revenue],
    expenses: &[Expense],
    orders: &[ServiceOrder],
    ratings: &[Rating],
) -> ReportSummary {
    let total_revenue: Decimal = revenues.iter().filter_map(|r| r.amount).sum();
    let total_expenses: Decimal = expenses.iter().filter_map(|e| e.amount).sum();

    let mut orders_by_state: BTreeMap<&'static str, usize> =
        OrderState::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for order in orders {
        *orders_by_state.entry(order.current_state().as_str()).or_default() += 1;
    }

    let scores: Vec<u8> = ratings.iter().filter_map(|r| r.score).collect();
    let average_rating = (!scores.is_empty()).then(|| {
        let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
        (mean * 100.0).round() / 100.0
    });

    ReportSummary {
        total_revenue,
        total_expenses,
        balance: total_revenue - total_expenses,
        total_orders: orders.len(),
        orders_by_state,
        average_rating,
        ratings_count: scores.len(),
    }
}
