use serde::Serialize;
use std::collections::BTreeMap;

/// One record from the tool's `key : value` output. The introducer key
/// becomes the kind tag and its value the identifier; a few well-known
/// attributes are promoted to top-level fields for convenient access, and
/// the full attribute map is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    pub kind: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descr: Option<String>,
    pub attrs: BTreeMap<String, String>,
}

impl ParsedRecord {
    fn new(kind: &str, id: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
            name: None,
            host: None,
            port: None,
            descr: None,
            attrs: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        match key {
            "name" => self.name = Some(value.to_string()),
            "host" | "agent-host" => self.host = Some(value.to_string()),
            "port" => self.port = value.parse().ok(),
            "descr" => self.descr = Some(value.to_string()),
            "description" => {
                self.descr = Some(value.to_string());
                self.attrs.insert("descr".to_string(), value.to_string());
            }
            _ => {}
        }
        self.attrs.insert(key.to_string(), value.to_string());
    }
}

/// Parse list output: every introduced record is kept, a blank line or a
/// repeated introducer key closes the open record, and end of input closes
/// without requiring a trailing blank line.
pub fn parse_records(text: &str, introducer: &str) -> Vec<ParsedRecord> {
    let mut records = Vec::new();
    let mut open: Option<ParsedRecord> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if let Some(record) = open.take() {
                records.push(record);
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = strip_quotes(value.trim());
        if key == introducer {
            if let Some(record) = open.take() {
                records.push(record);
            }
            open = Some(ParsedRecord::new(introducer, value));
            continue;
        }
        if let Some(record) = open.as_mut() {
            record.insert(key, value);
        }
    }
    if let Some(record) = open.take() {
        records.push(record);
    }
    records
}

/// Parse info output: the first introduced record wins, everything after it
/// closes is dropped. A second introducer occurrence seals the first record
/// rather than merging into it.
pub fn parse_single(text: &str, introducer: &str) -> Option<ParsedRecord> {
    parse_records(text, introducer).into_iter().next()
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
