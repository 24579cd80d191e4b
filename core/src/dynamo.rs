use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Number, Value};

use crate::error::StoreError;
use crate::model::RawItem;
use crate::store::ConcertStore;

const KEY_ATTRIBUTE: &str = "id";
const DATE_TIME_ATTRIBUTE: &str = "dateTime";

/// Concerts table in DynamoDB, keyed on `id`.
#[derive(Debug, Clone)]
pub struct DynamoConcertStore {
    client: Client,
    table_name: String,
}

impl DynamoConcertStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ConcertStore for DynamoConcertStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<RawItem>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(id.to_owned()))
            .send()
            .await
            .map_err(|err| {
                tracing::error!(table = %self.table_name, id, "get_item failed: {}", DisplayErrorContext(&err));
                StoreError::new(err)
            })?;

        Ok(output.item.map(item_to_json))
    }

    async fn scan_future_from(&self, now_epoch: i64) -> Result<Vec<RawItem>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("#dateTime > :now")
                .expression_attribute_names("#dateTime", DATE_TIME_ATTRIBUTE)
                .expression_attribute_values(":now", AttributeValue::N(now_epoch.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|err| {
                    tracing::error!(table = %self.table_name, "scan failed: {}", DisplayErrorContext(&err));
                    StoreError::new(err)
                })?;

            items.extend(output.items.unwrap_or_default().into_iter().map(item_to_json));

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, count = items.len(), "scanned upcoming concerts");
        Ok(items)
    }
}

fn item_to_json(item: HashMap<String, AttributeValue>) -> RawItem {
    item.into_iter()
        .map(|(name, value)| (name, attribute_to_json(value)))
        .collect()
}

/// `NULL` and binary attributes become `null`, which the concert decoder
/// treats the same as a missing attribute.
fn attribute_to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::L(list) => Value::Array(list.into_iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(item_to_json(map)),
        AttributeValue::Ss(set) => Value::Array(set.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(set.into_iter().map(number_to_json).collect()),
        _ => Value::Null,
    }
}

// DynamoDB sends numbers as strings; keep the text if it isn't a JSON number
// so decoding reports the bad attribute.
fn number_to_json(n: String) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = n.parse::<u64>() {
        return Value::Number(u.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::String(n))
}
