use serde_json::Value;

/// Rendered when an item field is missing or null.
pub const UNKNOWN_PRICE: &str = "N/A";
pub const UNKNOWN_NAME: &str = "Unknown";

/// One complete response from the stock endpoint.
///
/// The payload is kept untyped; sections and items are looked up
/// best-effort when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSnapshot(Value);

impl StockSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// True when the payload carries no stock information: null, an empty
    /// object, array or string, zero, or `false`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }

    /// Items under `<key>.items`, or `None` when the section is absent or
    /// has no item list.
    pub fn section_items(&self, key: &str) -> Option<Vec<StockItem<'_>>> {
        let items = self.0.get(key)?.get("items")?.as_array()?;
        Some(items.iter().map(StockItem).collect())
    }
}

impl From<Value> for StockSnapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Borrowed view over a single item record.
#[derive(Debug, Clone, Copy)]
pub struct StockItem<'a>(&'a Value);

impl StockItem<'_> {
    pub fn name(&self) -> String {
        display_field(self.0.get("name")).unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn usd_price(&self) -> String {
        display_field(self.0.get("usd_price")).unwrap_or_else(|| UNKNOWN_PRICE.to_string())
    }

    pub fn robux_price(&self) -> String {
        display_field(self.0.get("robux_price")).unwrap_or_else(|| UNKNOWN_PRICE.to_string())
    }
}

// Strings render bare, other scalars via their JSON text.
fn display_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
