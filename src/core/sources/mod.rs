pub mod cost_explorer;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::core::models::query::{CostAndUsage, AMORTIZED_COST, USAGE_QUANTITY};
use crate::core::period::BillingPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Monthly,
}

/// Cost dimension a query can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Service,
    UsageType,
}

impl Dimension {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Service => "SERVICE",
            Self::UsageType => "USAGE_TYPE",
        }
    }
}

/// Parameters of one `GetCostAndUsage` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostQuery {
    pub period: BillingPeriod,
    pub granularity: Granularity,
    pub metrics: Vec<&'static str>,
    pub group_by: Vec<Dimension>,
}

impl CostQuery {
    /// Single aggregate amortized cost for the period.
    pub fn total(period: BillingPeriod) -> Self {
        Self {
            period,
            granularity: Granularity::Monthly,
            metrics: vec![AMORTIZED_COST],
            group_by: Vec::new(),
        }
    }

    /// Amortized cost and usage quantity per service and usage type.
    pub fn by_usage_type(period: BillingPeriod) -> Self {
        Self {
            period,
            granularity: Granularity::Monthly,
            metrics: vec![AMORTIZED_COST, USAGE_QUANTITY],
            group_by: vec![Dimension::Service, Dimension::UsageType],
        }
    }
}

/// Anything that can answer a cost query.
#[async_trait]
pub trait CostSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<CostAndUsage>;
}
