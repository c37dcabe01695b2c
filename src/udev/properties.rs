//! Parser for `udevadm info --query=property` output.

use std::collections::HashMap;

/// Property holding the persistent device path (e.g., "platform-3f980000.usb-usb-0:1.3:1.0").
pub const ID_PATH: &str = "ID_PATH";

/// udev properties of one device, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(HashMap<String, String>);

impl Properties {
    /// Parse `KEY=VALUE` lines.
    ///
    /// Lines without `=` are skipped. The value is everything after the
    /// first `=`, with one layer of surrounding single quotes removed.
    /// A key seen more than once keeps its last value.
    pub fn parse(text: &str) -> Self {
        let mut props = HashMap::new();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            props.insert(key.to_string(), unquote(value).to_string());
        }

        Self(props)
    }

    /// Look up a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// `ID_PATH` value, if present.
    pub fn id_path(&self) -> Option<&str> {
        self.get(ID_PATH)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Strip at most one single quote from each end, independently, so a
/// value with only a leading or trailing quote loses that quote too.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('\'').unwrap_or(value);
    value.strip_suffix('\'').unwrap_or(value)
}
