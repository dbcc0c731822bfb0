use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stock at or below this count marks an item as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Opaque item identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// 後端有時會回傳數字 id
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        ItemId::from_value(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid item id: {}", raw)))
    }
}

impl ItemId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ItemId(s.clone())),
            Value::Number(n) => Some(ItemId(n.to_string())),
            _ => None,
        }
    }
}

/// A server-owned inventory record. Everything except the identifier and the
/// derived `lowStock` flag is kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,

    #[serde(rename = "lowStock", skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// `_id` 優先，沒有時改用 `id`；`lowStock` 只接受布林值，其他型別視為未設定
impl<'de> Deserialize<'de> for Item {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let id = match fields.remove("_id") {
            Some(raw) => ItemId::from_value(&raw)
                .ok_or_else(|| D::Error::custom(format!("invalid _id: {}", raw)))?,
            None => fields
                .get("id")
                .and_then(ItemId::from_value)
                .ok_or_else(|| D::Error::missing_field("_id"))?,
        };

        let low_stock = match fields.remove("lowStock") {
            Some(Value::Bool(flag)) => Some(flag),
            _ => None,
        };

        Ok(Self {
            id,
            low_stock,
            fields,
        })
    }
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            low_stock: None,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// Numeric stock count. Form-backed servers often echo numbers as strings.
    pub fn stock(&self) -> Option<f64> {
        match self.field("stock")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_low_stock_at(&self, threshold: i64) -> bool {
        self.stock()
            .map(|stock| stock <= threshold as f64)
            .unwrap_or(false)
    }

    /// Returns the item with `low_stock` recomputed against `threshold`.
    pub fn with_low_stock(mut self, threshold: i64) -> Self {
        self.low_stock = Some(self.is_low_stock_at(threshold));
        self
    }

    pub fn is_low_stock(&self) -> bool {
        self.low_stock.unwrap_or(false)
    }
}

/// One part of a multipart request body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Multipart payload for creating or updating an item. Parts keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    parts: Vec<FormPart>,
}

impl ItemForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type,
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_files(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, FormPart::File { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}
