//! Environment-variable substitution (envify analog).

use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use bindle_pipeline::Unit;
use regex::{Captures, Regex};

use crate::record::Chunk;

fn env_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"process\.env\.([A-Za-z_][A-Za-z0-9_]*)").expect("static regex")
    })
}

/// Replaces `process.env.KEY` references with literal values.
///
/// Only keys present in the table are substituted; unknown references are
/// left untouched. Values are injected as JavaScript string literals, so a
/// boolean flag arrives as `"true"` / `"false"` - the same convention the
/// variables were consumed with before.
pub struct EnvSubstitute {
    table: BTreeMap<String, String>,
}

impl EnvSubstitute {
    /// Substitution unit over the given variable table.
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    fn apply(&self, text: &str) -> String {
        env_re()
            .replace_all(text, |caps: &Captures<'_>| {
                let key = &caps[1];
                match self.table.get(key) {
                    Some(value) => {
                        serde_json::to_string(value).unwrap_or_else(|_| caps[0].to_string())
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[async_trait]
impl Unit<Chunk> for EnvSubstitute {
    fn name(&self) -> &str {
        "env-substitute"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let out = match item {
            Chunk::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Chunk::Bytes(self.apply(&text).into_bytes()),
                // Binary chunks pass through untouched.
                Err(e) => Chunk::Bytes(e.into_bytes()),
            },
            Chunk::File(mut record) => {
                if let Some(text) = record.contents_utf8() {
                    record.contents = self.apply(text).into_bytes();
                }
                Chunk::File(record)
            }
        };
        Ok(vec![out])
    }
}
