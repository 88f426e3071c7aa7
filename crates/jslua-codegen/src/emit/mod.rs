//! Lua emission
//!
//! The emitter walks the hoisted tree once, pre-order and left to right,
//! writing statements line by line and building expressions as strings.
//! Function literals are emitted into a scratch buffer and spliced into the
//! expression that contains them.

mod control;
mod expr;
mod stmt;

use std::collections::BTreeSet;

use jslua_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Span};
use jslua_hir::{analyze, Function, Program, Stmt, Unsupported, UnsupportedCategory};

use crate::alloc::IdAllocator;
use crate::names::escape_ident;
use crate::options::{EmitOptions, Newline};
use crate::runtime;
use crate::scope::{NameRole, ScopeStack};
use crate::Translation;

use control::ControlStack;

const INDENT: &str = "    ";

/// State for one conversion run.
pub struct Emitter<'a> {
    options: &'a EmitOptions,
    out: String,
    indent: usize,
    ids: IdAllocator,
    scope: ScopeStack,
    control: ControlStack,
    diagnostics: Diagnostics,
    /// Names looked up through a `with` object, one set per open `with`
    dynamic_names: Vec<BTreeSet<String>>,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a EmitOptions) -> Self {
        Self {
            options,
            out: String::new(),
            indent: 0,
            ids: IdAllocator::new(),
            scope: ScopeStack::new(),
            control: ControlStack::default(),
            diagnostics: Diagnostics::new(),
            dynamic_names: Vec::new(),
        }
    }

    pub fn emit_program(mut self, program: &Program) -> Translation {
        let info = analyze(&program.body);

        self.scope.push_object_ident(runtime::GLOBAL_OBJECTS, "program");
        self.scope.push_lexical(
            std::iter::once(runtime::GLOBAL_OBJECTS.to_string()).chain(info.vars.iter().cloned()),
            std::iter::once("eval".to_string()).chain(info.funcs.iter().cloned()),
            Vec::<String>::new(),
            "builtins-and-toplevels",
        );
        self.scope.define(runtime::GLOBAL_OBJECTS, NameRole::Builtin);
        if !info.funcs.contains("eval") {
            self.scope.define("eval", NameRole::Builtin);
        }

        self.marker("BEGIN");
        self.forward_declare(&info.funcs);
        self.block(&program.body);
        self.marker("END");

        self.scope.pop_scope();
        self.scope.pop_scope();

        log::debug!(
            "emitted {} bytes of Lua, {} diagnostics",
            self.out.len(),
            self.diagnostics.len()
        );

        let lua = match self.options.newline {
            Newline::Lf => self.out,
            Newline::Crlf => self.out.replace('\n', Newline::Crlf.as_str()),
        };
        Translation {
            lua,
            diagnostics: self.diagnostics,
        }
    }

    /// Emit statements, stopping after a `return` or an unlabeled `break`.
    fn block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
            if matches!(stmt, Stmt::Return(_) | Stmt::Break { label: None, .. }) {
                break;
            }
        }
    }

    /// Declare hoisted function names up front so mutually recursive
    /// declarations bind to locals.
    fn forward_declare(&mut self, funcs: &BTreeSet<String>) {
        let mut names = Vec::new();
        for name in funcs {
            if self.scope.mark_declared(name) {
                names.push(escape_ident(name));
            }
        }
        if !names.is_empty() {
            self.line(format!("local {}", names.join(", ")));
        }
    }

    /// `__DefineFunction(function (self, ...) ... end)`
    fn function_literal(&mut self, func: &Function) -> String {
        let info = analyze(&func.body);
        let uses_arguments = info.references("arguments");

        let saved_out = std::mem::take(&mut self.out);
        let saved_control = std::mem::take(&mut self.control);
        let outer_indent = self.indent;
        self.indent += 1;

        let mut params: Vec<String> = func.params.clone();
        if uses_arguments {
            params.push("arguments".to_string());
        }
        self.scope
            .push_lexical(info.vars.iter().cloned(), info.funcs.iter().cloned(), params.iter().cloned(), "function");
        for param in &params {
            self.scope.mark_declared(param);
        }

        let escaped: Vec<String> = func.params.iter().map(|p| escape_ident(p)).collect();
        let signature = if uses_arguments {
            if !escaped.is_empty() {
                self.line(format!("local {} = ...", escaped.join(", ")));
            }
            self.line("local arguments = table.pack(...)");
            self.line("arguments.__Length = arguments.n");
            "self, ...".to_string()
        } else {
            std::iter::once("self".to_string())
                .chain(escaped)
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.forward_declare(&info.funcs);
        self.block(&func.body);
        self.scope.pop_scope();

        self.indent = outer_indent;
        self.control = saved_control;
        let body = std::mem::replace(&mut self.out, saved_out);
        format!(
            "{}(function ({})\n{}{}end)",
            runtime::DEFINE_FUNCTION,
            signature,
            body,
            self.indent_str()
        )
    }

    fn indent_str(&self) -> String {
        INDENT.repeat(self.indent)
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let indent = self.indent_str();
        self.out.push_str(&indent);
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// A line at the enclosing level, such as `else`, between two indented bodies.
    fn middle(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
        self.indent += 1;
    }

    /// A comment line that is only written when markers are enabled.
    fn marker(&mut self, text: &str) {
        if self.options.markers {
            self.line(format!("-- {}", text));
        }
    }

    fn report(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::new(code, message).with_span(span).build());
    }

    fn unsupported(&mut self, node: &Unsupported) {
        let code = match node.category {
            UnsupportedCategory::Statement => DiagnosticCode::UnsupportedStatement,
            UnsupportedCategory::Expression => DiagnosticCode::UnsupportedExpression,
            UnsupportedCategory::Pattern => DiagnosticCode::UnsupportedPattern,
            UnsupportedCategory::Property => DiagnosticCode::UnsupportedProperty,
        };
        log::warn!("unsupported {} at {}..{}", node.kind, node.span.start, node.span.end);
        self.report(code, format!("{} is not supported", node.kind), node.span);
    }

    /// Record a name that a `with` object may shadow.
    fn note_dynamic(&mut self, name: &str) {
        if let Some(names) = self.dynamic_names.last_mut() {
            names.insert(name.to_string());
        }
    }

}
