//! DynamoDB backend using the official AWS SDK

use super::{ScanPage, TableScan};
use crate::error::{StoreError, StoreResult};
use crate::record::{AttrValue, RawRecord};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::{debug, info};

/// DynamoDB's `LastEvaluatedKey` / `ExclusiveStartKey`
pub type DynamoCursor = HashMap<String, AttributeValue>;

/// A DynamoDB table scanned with the `Scan` API
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoTable {
    /// Wrap an existing client
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Load AWS configuration from the environment and build a client.
    ///
    /// `region` and `endpoint_url` override what the environment provides;
    /// the endpoint is mostly useful against DynamoDB Local.
    pub async fn connect(
        table: impl Into<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> StoreResult<Self> {
        let table = table.into();
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref region) = region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(ref endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            return Err(StoreError::Config(
                "no AWS region configured; set AWS_REGION or pass --region".to_string(),
            ));
        }

        info!(
            table = %table,
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            endpoint = ?endpoint_url,
            "DynamoDB client initialized"
        );

        Ok(Self::new(aws_sdk_dynamodb::Client::new(&sdk_config), table))
    }
}

#[async_trait]
impl TableScan for DynamoTable {
    type Cursor = DynamoCursor;

    fn table_name(&self) -> &str {
        &self.table
    }

    async fn scan_page(
        &self,
        cursor: Option<DynamoCursor>,
        limit: Option<i32>,
    ) -> StoreResult<ScanPage<DynamoCursor>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .set_exclusive_start_key(cursor)
            .set_limit(limit)
            .send()
            .await
            .map_err(|e| StoreError::ScanFailed {
                table: self.table.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let rows: Vec<RawRecord> = output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(raw_record_from_item)
            .collect();

        debug!(
            rows = rows.len(),
            scanned = output.scanned_count,
            more = output.last_evaluated_key.is_some(),
            "Fetched page"
        );

        Ok(ScanPage {
            rows,
            next_cursor: output.last_evaluated_key,
        })
    }
}

/// Convert one SDK item into a [`RawRecord`]
pub fn raw_record_from_item(item: HashMap<String, AttributeValue>) -> RawRecord {
    item.into_iter()
        .map(|(k, v)| (k, attr_value_from_sdk(v)))
        .collect()
}

fn attr_value_from_sdk(value: AttributeValue) -> AttrValue {
    match value {
        AttributeValue::S(s) => AttrValue::S(s),
        AttributeValue::N(n) => AttrValue::N(n),
        AttributeValue::B(b) => AttrValue::B(b.into_inner()),
        AttributeValue::Bool(b) => AttrValue::Bool(b),
        AttributeValue::Null(_) => AttrValue::Null,
        AttributeValue::L(items) => AttrValue::L(items.into_iter().map(attr_value_from_sdk).collect()),
        AttributeValue::M(map) => AttrValue::M(
            map.into_iter()
                .map(|(k, v)| (k, attr_value_from_sdk(v)))
                .collect(),
        ),
        AttributeValue::Ss(ss) => AttrValue::Ss(ss),
        AttributeValue::Ns(ns) => AttrValue::Ns(ns),
        AttributeValue::Bs(bs) => AttrValue::Bs(bs.into_iter().map(|b| b.into_inner()).collect()),
        // Variants added to the SDK after this was written
        _ => AttrValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;

    #[test]
    fn test_item_conversion() {
        let mut item = HashMap::new();
        item.insert("userAndCollection".to_string(), AttributeValue::S("42".into()));
        item.insert("count".to_string(), AttributeValue::N("3".into()));
        item.insert("blob".to_string(), AttributeValue::B(Blob::new(vec![1, 2])));
        item.insert("gone".to_string(), AttributeValue::Null(true));
        item.insert(
            "tags".to_string(),
            AttributeValue::L(vec![AttributeValue::S("a".into()), AttributeValue::Bool(false)]),
        );

        let rec = raw_record_from_item(item);
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.get_str("userAndCollection"), "42");
        assert_eq!(rec.get("count"), Some(&AttrValue::N("3".into())));
        assert_eq!(rec.get("blob"), Some(&AttrValue::B(vec![1, 2])));
        assert_eq!(rec.get("gone"), Some(&AttrValue::Null));
        assert_eq!(
            rec.get("tags"),
            Some(&AttrValue::L(vec![AttrValue::S("a".into()), AttrValue::Bool(false)]))
        );
    }
}
