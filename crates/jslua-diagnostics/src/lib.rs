//! Diagnostic infrastructure for the jslua translator.
//!
//! Translation is best-effort: constructs the emitter cannot express in Lua
//! still produce output, and the reason is recorded here as a [`Diagnostic`]
//! with a stable code, a severity and (when known) a source span.
//!
//! # Example
//!
//! ```
//! use jslua_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, SimpleEmitter, SourceCache, Span,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add_file("app.js", "for (const x of xs) {}".to_string());
//!
//! let diag = Diagnostic::new(DiagnosticCode::UnsupportedStatement, "ForOfStatement is not supported")
//!     .with_span(Span::new(file_id, 0, 22))
//!     .build();
//!
//! let mut out = Vec::new();
//! SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("app.js:1:1: warning"));
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Severity};
pub use emitter::{DiagnosticEmitter, JsonEmitter, SimpleEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Location, Span};
