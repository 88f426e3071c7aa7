//! JavaScript parser wrapper using SWC
//!
//! Input is parsed as a classic (non-module) script so sloppy-mode constructs
//! such as `with` are accepted.

use anyhow::Result;
use jslua_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, FileId, SourceCache, Span};
use swc_common::{input::StringInput, sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::Script;
use swc_ecma_parser::{lexer::Lexer, Parser, Syntax};

pub use swc_ecma_ast;

pub use swc_common::Spanned;

/// A parsed script plus what is needed to map its spans back to the cache.
#[derive(Debug)]
pub struct ParseResult {
    pub script: Script,
    pub file_id: FileId,
    /// Converts SWC positions of this script into cache byte offsets
    pub spans: SpanMapper,
    /// Recoverable parse errors
    pub diagnostics: Diagnostics,
}

/// Maps SWC's global `BytePos` values onto per-file byte offsets.
#[derive(Debug, Clone, Copy)]
pub struct SpanMapper {
    file_id: FileId,
    base: u32,
}

impl SpanMapper {
    pub fn new(file_id: FileId, base: u32) -> Self {
        Self { file_id, base }
    }

    /// A mapper that turns every span into [`Span::DUMMY`].
    pub fn dummy() -> Self {
        Self {
            file_id: FileId::DUMMY,
            base: 0,
        }
    }

    pub fn map(&self, span: swc_common::Span) -> Span {
        if self.file_id == FileId::DUMMY || span.lo.0 == 0 {
            return Span::DUMMY;
        }
        Span::new(
            self.file_id,
            span.lo.0.saturating_sub(self.base),
            span.hi.0.saturating_sub(self.base),
        )
    }
}

/// Parse JavaScript source, registering it in `cache` for later diagnostics.
///
/// A fatal syntax error is recorded as a `P001` diagnostic in `diagnostics`
/// and returned as `Err`.
pub fn parse_script_with_cache(
    source: &str,
    filename: &str,
    cache: &mut SourceCache,
    diagnostics: &mut Diagnostics,
) -> Result<ParseResult> {
    let file_id = cache.add_file(filename, source.to_string());

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    let spans = SpanMapper::new(file_id, source_file.start_pos.0);

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        swc_ecma_ast::EsVersion::Es2022,
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let script = parser.parse_script().map_err(|e| {
        let msg = e.kind().msg().to_string();
        diagnostics.push(
            Diagnostic::error(DiagnosticCode::ParseError, msg.clone())
                .with_span(spans.map(e.span()))
                .build(),
        );
        anyhow::anyhow!("Parse error in {}: {}", filename, msg)
    })?;

    let mut recovered = Diagnostics::new();
    for error in parser.take_errors() {
        log::debug!("recovered parse error in {}: {}", filename, error.kind().msg());
        recovered.push(
            Diagnostic::warning(DiagnosticCode::ParseError, error.kind().msg().to_string())
                .with_span(spans.map(error.span()))
                .build(),
        );
    }

    Ok(ParseResult {
        script,
        file_id,
        spans,
        diagnostics: recovered,
    })
}

/// Parse without a source cache; spans in the result map to [`Span::DUMMY`].
pub fn parse_script(source: &str) -> Result<Script> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom("<input>".to_string())),
        source.to_string(),
    );

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        swc_ecma_ast::EsVersion::Es2022,
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let script = parser
        .parse_script()
        .map_err(|e| anyhow::anyhow!("Parse error: {}", e.kind().msg()))?;

    for error in parser.take_errors() {
        log::warn!("parse warning: {}", error.kind().msg());
    }

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_function() {
        let source = r#"
            function factorial(n) {
                if (n <= 1) return 1;
                return n * factorial(n - 1);
            }
        "#;
        let script = parse_script(source).unwrap();
        assert_eq!(script.body.len(), 1);
    }

    #[test]
    fn test_parse_sloppy_with() {
        let script = parse_script("with (Math) { x = max(1, 2); }").unwrap();
        assert_eq!(script.body.len(), 1);
    }

    #[test]
    fn test_parse_with_cache_maps_spans() {
        let source = "var x = 42;\nfoo(x);";
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();

        let result =
            parse_script_with_cache(source, "test.js", &mut cache, &mut diagnostics).unwrap();
        assert_eq!(result.script.body.len(), 2);
        assert!(result.diagnostics.is_empty());
        assert!(diagnostics.is_empty());

        let second = result.spans.map(result.script.body[1].span());
        assert_eq!(cache.location(second).unwrap().line, 2);
        assert!(cache.snippet(second).unwrap().starts_with("foo(x)"));
    }

    #[test]
    fn test_parse_error_recorded() {
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();

        let result = parse_script_with_cache("var x = ;", "bad.js", &mut cache, &mut diagnostics);
        assert!(result.is_err());
        assert!(diagnostics.contains(DiagnosticCode::ParseError));
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_dummy_mapper() {
        let span = swc_common::Span::new(swc_common::BytePos(3), swc_common::BytePos(9));
        assert!(SpanMapper::dummy().map(span).is_dummy());
    }
}
