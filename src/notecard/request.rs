//! Notecard request builder.
//!
//! A request is a name plus a flat map of typed fields. On the wire it is
//! a single JSON object terminated by `\n`, with the name under `req`:
//!
//! ```text
//! {"heartbeat":true,"mode":"minimum","product":"com.acme:tracker","req":"hub.set","seconds":6000}\n
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::{Error, Result};

/// Key under which the request name travels.
const NAME_KEY: &str = "req";

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i32),
    Bool(bool),
}

/// An in-progress request: one name, any number of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    name: String,
    fields: BTreeMap<String, Value>,
}

impl Request {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            fields: BTreeMap::new(),
        }
    }

    /// Re-target this request at `name` and drop every buffered field.
    pub fn reset(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
        self.fields.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a field. Last write for a key wins.
    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_owned(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize into a newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self).map_err(|_| Error::Encode)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let extra = self.fields.keys().filter(|k| *k != NAME_KEY).count();
        let mut map = serializer.serialize_map(Some(extra + 1))?;
        map.serialize_entry(NAME_KEY, &self.name)?;
        for (key, value) in self.fields.iter().filter(|(k, _)| *k != NAME_KEY) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
