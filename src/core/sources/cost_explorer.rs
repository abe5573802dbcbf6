//! AWS Cost Explorer backed [`CostSource`].

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types::{
    DateInterval as SdkDateInterval, GroupDefinition, GroupDefinitionType,
    MetricValue as SdkMetricValue,
};
use aws_sdk_costexplorer::Client;
use tracing::{debug, info};

use crate::core::models::query::{CostAndUsage, DateInterval, Group, MetricValue, ResultByTime};
use crate::core::sources::{CostQuery, CostSource, Granularity};

/// Cost Explorer only serves `us-east-1`.
pub const DEFAULT_REGION: &str = "us-east-1";

pub struct AwsCostExplorer {
    client: Client,
}

impl AwsCostExplorer {
    /// Build a client from the default credential chain with an explicit region.
    pub async fn with_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        debug!(region, "Cost Explorer client configured");
        Self {
            client: Client::new(&config),
        }
    }
}

fn sdk_granularity(granularity: Granularity) -> aws_sdk_costexplorer::types::Granularity {
    match granularity {
        Granularity::Monthly => aws_sdk_costexplorer::types::Granularity::Monthly,
    }
}

fn convert_metrics(
    metrics: Option<&HashMap<String, SdkMetricValue>>,
) -> HashMap<String, MetricValue> {
    metrics
        .into_iter()
        .flatten()
        .map(|(name, value)| {
            (
                name.clone(),
                MetricValue {
                    amount: value.amount().map(str::to_string),
                    unit: value.unit().map(str::to_string),
                },
            )
        })
        .collect()
}

/// Copy the SDK output into the crate's response model.
fn convert_output(output: &GetCostAndUsageOutput) -> CostAndUsage {
    let results_by_time = output
        .results_by_time()
        .iter()
        .map(|result| ResultByTime {
            time_period: result.time_period().map(|p| DateInterval {
                start: p.start().to_string(),
                end: p.end().to_string(),
            }),
            total: convert_metrics(result.total()),
            groups: result
                .groups()
                .iter()
                .map(|group| Group {
                    keys: group.keys().to_vec(),
                    metrics: convert_metrics(group.metrics()),
                })
                .collect(),
            estimated: result.estimated(),
        })
        .collect();

    CostAndUsage { results_by_time }
}

#[async_trait]
impl CostSource for AwsCostExplorer {
    fn name(&self) -> &'static str {
        "aws-cost-explorer"
    }

    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<CostAndUsage> {
        info!(
            start = %query.period.start,
            end = %query.period.end,
            metrics = ?query.metrics,
            group_by = ?query.group_by,
            "Querying Cost Explorer"
        );

        let time_period = SdkDateInterval::builder()
            .start(query.period.start.format("%Y-%m-%d").to_string())
            .end(query.period.end.format("%Y-%m-%d").to_string())
            .build()
            .context("Failed to build date interval")?;

        let mut request = self
            .client
            .get_cost_and_usage()
            .time_period(time_period)
            .granularity(sdk_granularity(query.granularity));

        for metric in &query.metrics {
            request = request.metrics(*metric);
        }
        for dimension in &query.group_by {
            request = request.group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key(dimension.key())
                    .build(),
            );
        }

        let output = request
            .send()
            .await
            .context("Failed to query AWS Cost Explorer")?;

        let response = convert_output(&output);
        match serde_json::to_string(&response) {
            Ok(json) => debug!(response = %json, "Cost Explorer response"),
            Err(e) => debug!(error = %e, "Could not serialize Cost Explorer response"),
        }
        Ok(response)
    }
}
