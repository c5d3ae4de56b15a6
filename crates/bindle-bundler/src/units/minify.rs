//! Minification unit built on the oxc toolchain.

use async_trait::async_trait;
use bindle_pipeline::Unit;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::BundlerError;
use crate::record::Chunk;

/// Validated minification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinifyLevel {
    /// No minification - output readable code. Records tracking source
    /// maps still go through a plain codegen pass so they pick up a map.
    None,
    /// Remove whitespace and comments only.
    Whitespace,
    /// Syntax-level compression, identifiers preserved.
    Syntax,
    /// Full minification including identifier mangling.
    #[default]
    Identifiers,
}

impl MinifyLevel {
    /// Parse a level from its string form (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error for unrecognized values.
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "false" => Ok(Self::None),
            "whitespace" => Ok(Self::Whitespace),
            "syntax" => Ok(Self::Syntax),
            "identifiers" | "true" => Ok(Self::Identifiers),
            _ => anyhow::bail!(
                "invalid minify level: '{s}'. Expected: none, whitespace, syntax, identifiers"
            ),
        }
    }

    /// True if any minification is enabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for MinifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Whitespace => write!(f, "whitespace"),
            Self::Syntax => write!(f, "syntax"),
            Self::Identifiers => write!(f, "identifiers"),
        }
    }
}

/// Minifies record contents (parse, compress/mangle, codegen).
///
/// When a record is tracking source maps, the minified output gets a fresh
/// map generated against the bundled source; the incoming map is not
/// composed with it.
pub struct Minify {
    level: MinifyLevel,
    reserved: Vec<String>,
}

impl Minify {
    /// Minify unit at the given level.
    pub fn new(level: MinifyLevel) -> Self {
        Self {
            level,
            reserved: Vec::new(),
        }
    }

    /// Identifiers that must survive mangling.
    ///
    /// The mangler has no per-identifier opt-out, so any reserved name
    /// drops the effective level from `Identifiers` to `Syntax`.
    pub fn reserved(mut self, names: Vec<String>) -> Self {
        self.reserved = names;
        self
    }

    fn minify_source(
        &self,
        source: &str,
        name: &str,
        want_map: bool,
    ) -> anyhow::Result<(String, Option<String>)> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
        if !parsed.errors.is_empty() {
            let messages: Vec<String> =
                parsed.errors.iter().map(|e| e.to_string()).collect();
            return Err(BundlerError::Parse {
                file: name.to_string(),
                message: messages.join(", "),
            }
            .into());
        }
        let mut program = parsed.program;

        let mangle = matches!(self.level, MinifyLevel::Identifiers) && self.reserved.is_empty();
        if matches!(self.level, MinifyLevel::Syntax | MinifyLevel::Identifiers) {
            let options = MinifierOptions {
                mangle: mangle.then(MangleOptions::default),
                compress: Some(CompressOptions::default()),
            };
            Minifier::new(options).minify(&allocator, &mut program);
        }

        let minify = self.level.is_enabled();
        let options = CodegenOptions {
            minify,
            comments: if minify {
                CommentOptions::disabled()
            } else {
                CommentOptions::default()
            },
            source_map_path: want_map.then(|| std::path::PathBuf::from(name)),
            ..CodegenOptions::default()
        };
        let generated = Codegen::new().with_options(options).build(&program);
        let map = generated.map.map(|m| m.to_json_string());
        Ok((generated.code, map))
    }
}

#[async_trait]
impl Unit<Chunk> for Minify {
    fn name(&self) -> &str {
        "minify"
    }

    async fn process(&mut self, item: Chunk) -> anyhow::Result<Vec<Chunk>> {
        let out = match item {
            Chunk::Bytes(bytes) => {
                if !self.level.is_enabled() {
                    return Ok(vec![Chunk::Bytes(bytes)]);
                }
                match String::from_utf8(bytes) {
                    Ok(text) => {
                        let (code, _) = self.minify_source(&text, "bundle.js", false)?;
                        Chunk::Bytes(code.into_bytes())
                    }
                    Err(e) => Chunk::Bytes(e.into_bytes()),
                }
            }
            Chunk::File(mut record) => {
                let want_map = record.track_sourcemaps;
                if !self.level.is_enabled() && !want_map {
                    return Ok(vec![Chunk::File(record)]);
                }
                if let Some(text) = record.contents_utf8() {
                    let name = record.file_name();
                    let (code, map) = self.minify_source(text, &name, want_map)?;
                    record.contents = code.into_bytes();
                    if want_map {
                        record.sourcemap = map;
                    }
                }
                Chunk::File(record)
            }
        };
        Ok(vec![out])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn parse_valid_levels() {
        assert_eq!(MinifyLevel::parse("none").unwrap(), MinifyLevel::None);
        assert_eq!(
            MinifyLevel::parse("Whitespace").unwrap(),
            MinifyLevel::Whitespace
        );
        assert_eq!(MinifyLevel::parse("SYNTAX").unwrap(), MinifyLevel::Syntax);
        assert_eq!(
            MinifyLevel::parse("identifiers").unwrap(),
            MinifyLevel::Identifiers
        );
        assert_eq!(MinifyLevel::parse("true").unwrap(), MinifyLevel::Identifiers);
    }

    #[test]
    fn parse_invalid_level() {
        assert!(MinifyLevel::parse("mangle").is_err());
        assert!(MinifyLevel::parse("").is_err());
    }

    #[tokio::test]
    async fn level_none_is_a_passthrough() {
        let mut unit = Minify::new(MinifyLevel::None);
        let input = Chunk::Bytes(b"var  a   =  1 ;".to_vec());
        let out = unit.process(input.clone()).await.unwrap();
        assert_eq!(out, vec![input]);
    }

    #[tokio::test]
    async fn level_none_still_maps_tracked_records() {
        let mut unit = Minify::new(MinifyLevel::None);
        let mut record = Record::new("a.js", b"var answer = 1;".to_vec());
        record.track_sourcemaps = true;
        let out = unit.process(Chunk::File(record)).await.unwrap();
        let record = out[0].as_file().unwrap();
        assert!(record.sourcemap.is_some());
        // Output stays readable: no mangling, no compression.
        assert!(record.contents_utf8().unwrap().contains("var answer = 1;"));
    }

    #[tokio::test]
    async fn whitespace_level_shrinks_output() {
        let mut unit = Minify::new(MinifyLevel::Whitespace);
        let source = "var answer = 1;\n\n// a comment\nvar other = answer + 1;\n";
        let out = unit
            .process(Chunk::Bytes(source.as_bytes().to_vec()))
            .await
            .unwrap();
        let text = out[0].text().unwrap();
        assert!(text.len() < source.len());
        assert!(!text.contains("a comment"), "comments must be stripped");
    }

    #[tokio::test]
    async fn parse_failure_is_an_error() {
        let mut unit = Minify::new(MinifyLevel::Whitespace);
        let err = unit
            .process(Chunk::Bytes(b"var = = 1".to_vec()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[tokio::test]
    async fn tracked_records_get_a_map() {
        let mut unit = Minify::new(MinifyLevel::Syntax);
        let mut record = Record::new("a.js", b"var a = 1; var b = a;".to_vec());
        record.track_sourcemaps = true;
        let out = unit.process(Chunk::File(record)).await.unwrap();
        let record = out[0].as_file().unwrap();
        assert!(record.sourcemap.is_some());
    }
}
