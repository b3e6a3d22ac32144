use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::model::LogRecord;

/// Serialize ordered `(key, value)` pairs as a mapping, preserving order.
pub fn serialize_pairs_as_map<K, V, S>(pairs: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

impl Serialize for LogRecord {
    /// Flat mapping: `raw`, `type`, present well-known fields, `severity`,
    /// then the extras in insertion order.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let known = [
            ("timestamp", &self.timestamp),
            ("ip", &self.ip),
            ("user", &self.user),
            ("method", &self.method),
            ("path", &self.path),
            ("protocol", &self.protocol),
            ("status", &self.status),
            ("size", &self.size),
            ("message", &self.message),
            ("user_agent", &self.user_agent),
        ];

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("raw", &self.raw)?;
        map.serialize_entry("type", &self.format)?;
        for (key, value) in known {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("severity", &self.severity)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
