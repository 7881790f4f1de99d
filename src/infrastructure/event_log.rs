use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};

/// One structured log line. `scope` names the subsystem (router, update,
/// tree, cache), `action` the thing that happened within it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub ts: u64,
    pub scope: String,
    pub action: String,
    pub data: Value,
}

impl Entry {
    pub fn new(scope: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            ts: now_millis(),
            scope: scope.into(),
            action: action.into(),
            data: Value::Object(Map::new()),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        if let Value::Object(data) = &mut self.data {
            data.insert(key.into(), value);
        }
        self
    }

    pub fn to_json_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("ts".to_string(), Value::from(self.ts));
        object.insert("scope".to_string(), Value::from(self.scope.clone()));
        object.insert("action".to_string(), Value::from(self.action.clone()));
        object.insert("data".to_string(), self.data.clone());
        Value::Object(object)
    }
}

fn now_millis() -> u64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub trait EventLogger: Send {
    fn log(&self, entry: Entry);
}

pub struct NullEventLogger;

impl EventLogger for NullEventLogger {
    fn log(&self, _entry: Entry) {}
}

/// Append-only JSONL sink. Logging must never disturb the update loop, so
/// every failure path drops the entry silently.
pub struct FileEventLogger {
    writer: Mutex<BufWriter<File>>,
}

impl FileEventLogger {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl EventLogger for FileEventLogger {
    fn log(&self, entry: Entry) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        let Ok(line) = serde_json::to_string(&entry.to_json_value()) else {
            return;
        };

        if writer.write_all(line.as_bytes()).is_err() {
            return;
        }
        if writer.write_all(b"\n").is_err() {
            return;
        }
        let _ = writer.flush();
    }
}
