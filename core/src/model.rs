use serde::{Deserialize, Deserializer, Serialize};

/// An untyped record as handed back by a storage gateway.
pub type RawItem = serde_json::Map<String, serde_json::Value>;

/// A concert as persisted in the concerts table.
///
/// Missing or null text attributes decode to empty strings and missing or null
/// prices to zero, so that they fail [`RawConcert::is_complete`] instead of decoding.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawConcert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, rename = "imageURL", deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default)]
    pub date_time: Option<i64>,
    #[serde(default)]
    pub total_tickets: Option<u32>,
    #[serde(default)]
    pub tickets_sold: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub concession_price: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl RawConcert {
    pub fn from_item(item: RawItem) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(item))
    }

    /// True when every attribute needed to build a [`ClientConcert`] is
    /// present and in range.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty()
            && !self.description.is_empty()
            && !self.image_url.is_empty()
            && self.date_time.is_some_and(|t| t > 0)
            && self.total_tickets.is_some_and(|t| t > 0)
            && self.tickets_sold.is_some()
            && self.full_price > 0.0
            && self.concession_price > 0.0
    }

    /// A concert starting exactly at `now` is still on sale.
    pub fn is_in_past(&self, now: i64) -> bool {
        self.date_time.is_some_and(|t| t < now)
    }
}

/// A concert as returned to clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConcert {
    pub id: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub date: String,
    pub time: String,
    pub available_tickets: u32,
    pub full_price: f64,
    pub concession_price: f64,
}
