//! Payload types and serialization.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Reserved event-data key holding a revenue amount.
pub const REVENUE_KEY: &str = "revenue";

/// Reserved event-data key holding an ISO 4217 currency code.
pub const CURRENCY_KEY: &str = "currency";

/// Envelope discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Page view or custom event.
    Event,
    /// Identity property update.
    Identify,
}

/// Scalar value stored in event data or identity properties.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    String(String),
    Number(Number),
    /// Serialized as an ISO-8601 string with millisecond precision.
    Date(DateTime<Utc>),
    Null,
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::String(s) => serializer.serialize_str(s),
            DataValue::Number(n) => n.serialize(serializer),
            DataValue::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            DataValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(DataValue::String(s)),
            Value::Number(n) => Ok(DataValue::Number(n)),
            Value::Null => Ok(DataValue::Null),
            other => Err(D::Error::custom(format!(
                "expected a string, number or null, got {other}"
            ))),
        }
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.into())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(d: DateTime<Utc>) -> Self {
        DataValue::Date(d)
    }
}

impl From<f64> for DataValue {
    /// Non-finite values become `Null`, as JSON has no representation for them.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(DataValue::Null, DataValue::Number)
    }
}

impl From<f32> for DataValue {
    fn from(n: f32) -> Self {
        DataValue::from(f64::from(n))
    }
}

macro_rules! data_value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for DataValue {
            fn from(n: $t) -> Self {
                DataValue::Number(n.into())
            }
        })*
    };
}

data_value_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DataValue::Null, Into::into)
    }
}

/// String-keyed map of scalar values.
///
/// Used both for custom event data and for accumulated identity properties.
/// The keys `revenue` and `currency` are reserved for the revenue report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData(BTreeMap<String, DataValue>);

impl EventData {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a property, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DataValue>,
    ) -> Option<DataValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a property.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.0.get(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all properties.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DataValue)> {
        self.0.iter()
    }

    /// Shallow merge: keys from `other` replace existing keys.
    pub fn merge(&mut self, other: EventData) {
        self.0.extend(other.0);
    }

    /// Set the reserved revenue fields after validating them.
    pub fn with_revenue(
        self,
        amount: f64,
        currency: impl Into<String>,
    ) -> Result<Self, crate::Error> {
        if !amount.is_finite() {
            return Err(crate::Error::InvalidRevenue(format!(
                "revenue must be a finite number, got {amount}"
            )));
        }
        let currency: String = currency.into();
        let data = self
            .property(REVENUE_KEY, amount)
            .property(CURRENCY_KEY, currency);
        data.validate_revenue()?;
        Ok(data)
    }

    /// Revenue amount, if present and numeric.
    pub fn revenue(&self) -> Option<f64> {
        match self.get(REVENUE_KEY) {
            Some(DataValue::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Currency code, if present.
    pub fn currency(&self) -> Option<&str> {
        match self.get(CURRENCY_KEY) {
            Some(DataValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Check the reserved revenue keys, when present.
    ///
    /// `revenue` must be a number and `currency` a three-letter uppercase code.
    pub fn validate_revenue(&self) -> Result<(), crate::Error> {
        match self.get(REVENUE_KEY) {
            None | Some(DataValue::Number(_)) => {}
            Some(other) => {
                return Err(crate::Error::InvalidRevenue(format!(
                    "revenue must be a number, got {other:?}"
                )))
            }
        }
        match self.get(CURRENCY_KEY) {
            None => Ok(()),
            Some(DataValue::String(code))
                if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) =>
            {
                Ok(())
            }
            Some(other) => Err(crate::Error::InvalidRevenue(format!(
                "currency must be an ISO 4217 code, got {other:?}"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for EventData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outbound payload.
///
/// Every field is optional and omitted from the JSON body when unset.
/// Keys outside the known fields are kept in `extra` and serialized
/// alongside them. `website` is always overwritten with the configured site
/// identifier at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EventData>,
    /// Unrecognized keys, passed through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session identifier.
    pub fn session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Set the hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the language tag.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the referrer.
    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Set the screen size, formatted as `WxH`.
    pub fn screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    /// Set the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the page path.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the event name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the event data.
    pub fn data(mut self, data: EventData) -> Self {
        self.data = Some(data);
        self
    }

    /// Set a key outside the known fields.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Set `website`. Ignored on the wire: dispatch injects the configured site.
    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Shallow merge where every field set in `overrides` wins.
    pub fn merge(self, overrides: Payload) -> Payload {
        let mut extra = self.extra;
        extra.extend(overrides.extra);
        Payload {
            session: overrides.session.or(self.session),
            hostname: overrides.hostname.or(self.hostname),
            language: overrides.language.or(self.language),
            referrer: overrides.referrer.or(self.referrer),
            screen: overrides.screen.or(self.screen),
            title: overrides.title.or(self.title),
            url: overrides.url.or(self.url),
            name: overrides.name.or(self.name),
            data: overrides.data.or(self.data),
            extra,
            website: overrides.website.or(self.website),
        }
    }
}

/// Wire body: `{"type": ..., "payload": {...}}`.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub payload: &'a Payload,
}
