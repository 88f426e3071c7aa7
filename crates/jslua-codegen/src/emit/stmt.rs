//! Statement lowering.

use jslua_diagnostics::{Diagnostic, DiagnosticCode, Span};
use jslua_hir::{CatchClause, Expr, ForInLeft, ForInit, Function, Stmt, SwitchCase, VarDeclarator};

use super::control::{ControlFrame, Jump};
use super::expr::ExprCtx;
use super::Emitter;
use crate::names::escape_ident;
use crate::runtime;

/// Phases of the try/catch/finally protocol, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TryPhase {
    /// `pcall` around the `try` block
    ProtectedBody,
    /// The `finally` block as a closure, not yet called
    Finalizer,
    /// The `catch` block as a one-parameter closure
    Handler,
    /// The body returned a value: finalize and return it
    EarlyReturn,
    /// The body raised: run the handler, finalize and return its result
    CatchDispatch,
    /// Neither returned: finalize for side effects
    FinalizerOnly,
}

impl TryPhase {
    fn marker(&self) -> &'static str {
        match self {
            TryPhase::ProtectedBody => "TryBody",
            TryPhase::Finalizer => "Finally",
            TryPhase::Handler => "Catch",
            TryPhase::EarlyReturn => "EarlyReturn",
            TryPhase::CatchDispatch => "CheckCatch",
            TryPhase::FinalizerOnly => "JustFinalizer",
        }
    }
}

/// Scaffolding locals of one `try` statement.
struct TryNames {
    status: String,
    value: String,
    catch_value: String,
    finalizer: String,
    handler: String,
}

impl<'a> Emitter<'a> {
    pub(super) fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Empty => {}
            Stmt::Expr(expr) => self.expr_stmt(expr),
            Stmt::VarDecl { decls, .. } => self.var_decl(decls),
            Stmt::FnDecl(func) => self.fn_decl(func),
            Stmt::Return(Some(value)) => {
                let value = self.expr(value);
                self.line(format!("return {}", value));
            }
            Stmt::Return(None) => self.line("return nil"),
            Stmt::Throw(value) => {
                let value = self.expr(value);
                self.line(format!("error({{[\"data\"]={}}})", value));
            }
            Stmt::Break { label, span } => self.jump_break(label.as_deref(), *span),
            Stmt::Continue { label, span } => self.jump_continue(label.as_deref(), *span),
            Stmt::If { test, cons, alt } => self.if_stmt(test, cons, alt.as_deref()),
            Stmt::While { .. } | Stmt::DoWhile { .. } | Stmt::For { .. } | Stmt::ForIn { .. } => {
                self.loop_stmt(stmt, &[])
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => self.switch_stmt(discriminant, cases),
            Stmt::Try {
                block,
                handlers,
                finalizer,
                span,
            } => self.try_stmt(block, handlers, finalizer.as_deref(), *span),
            Stmt::With { object, body, span } => self.with_stmt(object, body, *span),
            Stmt::Labeled { label, body } => self.labeled(label, body),
            Stmt::Block(stmts) => {
                self.open("do");
                self.block(stmts);
                self.close("end");
            }
            Stmt::Unsupported(node) => {
                self.unsupported(node);
                self.line(format!("--[[{}]]", node.kind));
            }
        }
    }

    /// Statements of a nested body, without an extra `do ... end`.
    fn body(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(stmts) => self.block(stmts),
            other => self.stmt(other),
        }
    }

    pub(super) fn expr_stmt(&mut self, expr: &Expr) {
        match expr {
            Expr::Seq(items) => {
                for item in items {
                    self.expr_stmt(item);
                }
            }
            Expr::Unsupported(node) => {
                self.unsupported(node);
                self.line(format!("--[[{}]]", node.kind));
            }
            expr if expr.is_statement_like() => {
                let text = self.expr_with(expr, ExprCtx::STATEMENT);
                // a line starting with `(` would continue the previous call
                if text.starts_with('(') {
                    self.line(format!(";{}", text));
                } else {
                    self.line(text);
                }
            }
            other => {
                let value = self.expr(other);
                self.line(format!("{}({})", runtime::SINK, value));
            }
        }
    }

    fn var_decl(&mut self, decls: &[VarDeclarator]) {
        let mut fresh = Vec::new();
        for decl in decls {
            if self.scope.mark_declared(&decl.name) {
                fresh.push(escape_ident(&decl.name));
            }
        }
        if !fresh.is_empty() {
            self.line(format!("local {}", fresh.join(", ")));
        }
        for decl in decls {
            if let Some(init) = &decl.init {
                let target = self.expr_with(&Expr::ident(decl.name.as_str()), ExprCtx::TARGET);
                let value = self.expr(init);
                self.line(format!("{} = {}", target, value));
            }
        }
    }

    fn fn_decl(&mut self, func: &Function) {
        let Some(name) = func.name.as_deref() else {
            self.diagnostics.push(
                Diagnostic::new(DiagnosticCode::InternalError, "function declaration without a name")
                    .build(),
            );
            return;
        };
        if self.scope.mark_declared(name) {
            self.line(format!("local {}", escape_ident(name)));
        }
        let target = self.expr_with(&Expr::ident(name), ExprCtx::TARGET);
        let literal = self.function_literal(func);
        self.line(format!("{} = {}", target, literal));
    }

    fn jump_break(&mut self, label: Option<&str>, span: Span) {
        match self.control.break_target(label) {
            Jump::Break => self.line("break"),
            Jump::Goto(target) => self.line(format!("goto {}", target)),
            Jump::Blocked => {
                self.report(
                    DiagnosticCode::UnsupportedStatement,
                    "break cannot leave a try/catch/finally block",
                    span,
                );
                self.line("--[[BreakStatement]]");
            }
            Jump::Missing => {
                self.report(DiagnosticCode::UnsupportedStatement, "break has no target", span);
                self.line("--[[BreakStatement]]");
            }
        }
    }

    fn jump_continue(&mut self, label: Option<&str>, span: Span) {
        match self.control.continue_target(label, &mut self.ids) {
            Jump::Goto(target) => self.line(format!("goto {}", target)),
            Jump::Break => self.line("break"),
            Jump::Blocked => {
                self.report(
                    DiagnosticCode::UnsupportedStatement,
                    "continue cannot leave a try/catch/finally block",
                    span,
                );
                self.line("--[[ContinueStatement]]");
            }
            Jump::Missing => {
                self.report(DiagnosticCode::StrayContinue, "continue has no enclosing loop", span);
                self.line("--[[ContinueStatement]]");
            }
        }
    }

    fn condition(&mut self, test: &Expr) -> String {
        let test = self.expr(test);
        format!("{}({})", runtime::TO_BOOLEAN, test)
    }

    fn if_stmt(&mut self, test: &Expr, cons: &Stmt, alt: Option<&Stmt>) {
        let test = self.condition(test);
        self.open(format!("if {} then", test));
        self.body(cons);

        let mut alt = alt;
        while let Some(next) = alt {
            match next {
                Stmt::If {
                    test,
                    cons,
                    alt: rest,
                } => {
                    let test = self.condition(test);
                    self.middle(format!("elseif {} then", test));
                    self.body(cons);
                    alt = rest.as_deref();
                }
                other => {
                    self.middle("else");
                    self.body(other);
                    alt = None;
                }
            }
        }
        self.close("end");
    }

    /// Emit a loop. `labels` name the labeled statements wrapping it, so
    /// `continue label` lands on it.
    fn loop_stmt(&mut self, stmt: &Stmt, labels: &[String]) {
        match stmt {
            Stmt::While { test, body } => {
                let test = self.condition(test);
                self.open(format!("while {} do", test));
                self.loop_body(body, labels);
                self.close("end");
            }
            Stmt::DoWhile { body, test } => {
                self.open("repeat");
                self.loop_body(body, labels);
                let test = self.condition(test);
                self.close(format!("until not {}", test));
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                match init {
                    Some(ForInit::VarDecl { decls, .. }) => self.var_decl(decls),
                    Some(ForInit::Expr(expr)) => self.expr_stmt(expr),
                    None => {}
                }
                let test = match test {
                    Some(test) => self.condition(test),
                    None => "true".to_string(),
                };
                self.open(format!("while {} do", test));
                self.loop_body(body, labels);
                if let Some(update) = update {
                    self.expr_stmt(update);
                }
                self.close("end");
            }
            Stmt::ForIn { left, right, body } => self.for_in(left, right, body, labels),
            other => self.stmt(other),
        }
    }

    /// The body of a loop inside its own `do ... end`, followed by the
    /// continue landing labels.
    fn loop_body(&mut self, body: &Stmt, labels: &[String]) {
        self.control.push(ControlFrame::Loop {
            labels: labels.to_vec(),
            continue_label: None,
        });
        self.open("do");
        self.body(body);
        self.close("end");
        let frame = self.control.pop();

        for label in labels {
            self.line(format!("::{}::", escape_ident(label)));
        }
        if let Some(ControlFrame::Loop {
            continue_label: Some(landing),
            ..
        }) = frame
        {
            self.line(format!("::{}::", landing));
        }
    }

    fn for_in(&mut self, left: &ForInLeft, right: &Expr, body: &Stmt, labels: &[String]) {
        let object = self.expr(right);
        let ignored = self.ids.fresh("__tmp");
        match left {
            ForInLeft::VarDecl { name, .. } | ForInLeft::Target(Expr::Ident(name)) => {
                let key = escape_ident(name);
                self.open(format!(
                    "for {}, {} in {}({}) do",
                    key,
                    ignored,
                    runtime::ITERATE,
                    object
                ));
                self.loop_body(body, labels);
            }
            ForInLeft::Target(target) => {
                let key = self.ids.fresh("__tmp");
                self.open(format!(
                    "for {}, {} in {}({}) do",
                    key,
                    ignored,
                    runtime::ITERATE,
                    object
                ));
                let target = self.expr_with(target, ExprCtx::TARGET);
                self.line(format!("{} = {}", target, key));
                self.loop_body(body, labels);
            }
        }
        self.close("end");
    }

    /// `switch` as a one-shot `repeat ... until true`, so `break` leaves it.
    fn switch_stmt(&mut self, discriminant: &Expr, cases: &[SwitchCase]) {
        let value = self.ids.fresh("__tmp");
        let selected = self.ids.fresh("__tmp");

        self.open("repeat");
        let discriminant = self.expr(discriminant);
        self.line(format!("local {} = {}", value, discriminant));
        self.line(format!("local {} = 0", selected));

        let mut first = true;
        for (index, case) in cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let test = self.expr(test);
                let keyword = if first { "if" } else { "elseif" };
                first = false;
                self.line(format!(
                    "{} rawequal({}, {}) then {} = {}",
                    keyword,
                    value,
                    test,
                    selected,
                    index + 1
                ));
            }
        }
        let default = cases.iter().position(|case| case.test.is_none());
        match (first, default) {
            (true, Some(index)) => self.line(format!("{} = {}", selected, index + 1)),
            (true, None) => {}
            (false, Some(index)) => {
                self.line(format!("else {} = {}", selected, index + 1));
                self.line("end");
            }
            (false, None) => self.line("end"),
        }

        self.control.push(ControlFrame::Switch);
        for (index, case) in cases.iter().enumerate() {
            if case.body.is_empty() {
                continue;
            }
            self.open(format!("if {0} ~= 0 and {0} <= {1} then", selected, index + 1));
            self.block(&case.body);
            self.close("end");
        }
        self.control.pop();
        self.close("until true");
    }

    fn try_stmt(
        &mut self,
        block: &[Stmt],
        handlers: &[CatchClause],
        finalizer: Option<&[Stmt]>,
        span: Span,
    ) {
        let names = TryNames {
            status: self.ids.fresh("__TryStatus"),
            value: self.ids.fresh("__TryReturnValue"),
            catch_value: self.ids.fresh("__CatchReturnValue"),
            finalizer: self.ids.fresh("__TryFinalizer"),
            handler: self.ids.fresh("__TryHandler"),
        };
        let handler = match handlers {
            [] => None,
            [single] => Some(single),
            [first, ..] => {
                self.report(
                    DiagnosticCode::MultipleCatchClauses,
                    format!("{} catch clauses on one try; only the first is used", handlers.len()),
                    span,
                );
                self.line("--[[MultipleCatchClauses]]");
                Some(first)
            }
        };

        self.open("do");
        for phase in [
            TryPhase::ProtectedBody,
            TryPhase::Finalizer,
            TryPhase::Handler,
            TryPhase::EarlyReturn,
            TryPhase::CatchDispatch,
            TryPhase::FinalizerOnly,
        ] {
            self.try_phase(phase, &names, block, handler, finalizer);
        }
        self.close("end");
    }

    fn try_phase(
        &mut self,
        phase: TryPhase,
        names: &TryNames,
        block: &[Stmt],
        handler: Option<&CatchClause>,
        finalizer: Option<&[Stmt]>,
    ) {
        let call_finalizer = finalizer.map(|_| format!("{}()", names.finalizer));
        match phase {
            TryPhase::ProtectedBody => {
                self.marker(phase.marker());
                self.open(format!(
                    "local {}, {} = pcall(function ()",
                    names.status, names.value
                ));
                self.control.push(ControlFrame::Barrier);
                self.block(block);
                self.control.pop();
                self.close("end)");
            }
            TryPhase::Finalizer => {
                let Some(finalizer) = finalizer else { return };
                self.marker(phase.marker());
                self.open(format!("local {} = (function ()", names.finalizer));
                self.control.push(ControlFrame::Barrier);
                self.block(finalizer);
                self.control.pop();
                self.close("end)");
            }
            TryPhase::Handler => {
                let Some(handler) = handler else { return };
                self.marker(phase.marker());
                let params: Vec<String> = handler.param.iter().cloned().collect();
                let signature = params.iter().map(|p| escape_ident(p)).collect::<Vec<_>>().join(", ");
                self.open(format!("local {} = (function ({})", names.handler, signature));
                self.scope
                    .push_lexical(Vec::<String>::new(), Vec::<String>::new(), params.iter().cloned(), "catch");
                for param in &params {
                    self.scope.mark_declared(param);
                }
                self.control.push(ControlFrame::Barrier);
                self.block(&handler.body);
                self.control.pop();
                self.scope.pop_scope();
                self.close("end)");
            }
            TryPhase::EarlyReturn => {
                self.marker(phase.marker());
                self.open(format!("if {} and nil ~= {} then", names.status, names.value));
                if let Some(call) = &call_finalizer {
                    self.line(call);
                }
                self.line(format!("return {}", names.value));
                self.close("end");
            }
            TryPhase::CatchDispatch => {
                self.marker(phase.marker());
                self.open(format!("if not {} then", names.status));
                match handler {
                    Some(_) => {
                        self.line(format!(
                            "local {} = {}({}.data or {})",
                            names.catch_value, names.handler, names.value, names.value
                        ));
                        if let Some(call) = &call_finalizer {
                            self.line(call);
                        }
                        self.line(format!("return {}", names.catch_value));
                    }
                    None => {
                        if let Some(call) = &call_finalizer {
                            self.line(call);
                        }
                        self.line(format!("error({}, 0)", names.value));
                    }
                }
                self.close("end");
            }
            TryPhase::FinalizerOnly => {
                let Some(call) = call_finalizer else { return };
                self.marker(phase.marker());
                self.line(call);
            }
        }
    }

    fn with_stmt(&mut self, object: &Expr, body: &Stmt, span: Span) {
        let proxy = self.ids.fresh("__tmp");
        let object = self.expr(object);

        self.open("do");
        let comment = if self.options.markers { " -- WithStmt" } else { "" };
        self.line(format!(
            "local {} = {}({}){}",
            proxy,
            runtime::TO_OBJECT,
            object,
            comment
        ));

        self.scope.push_object_ident(&proxy, "with");
        self.dynamic_names.push(Default::default());
        self.body(body);
        let names = self.dynamic_names.pop().unwrap_or_default();
        self.scope.pop_scope();

        let comment = if self.options.markers { " -- WithStmtEnd" } else { "" };
        self.close(format!("end{}", comment));

        let mut diagnostic = Diagnostic::hint(
            DiagnosticCode::PartialWithScope,
            "names in a with body are not looked up on the scope object",
        )
        .with_span(span);
        if !names.is_empty() {
            let listed: Vec<&str> = names.iter().map(String::as_str).collect();
            diagnostic = diagnostic.with_help(format!("affected names: {}", listed.join(", ")));
        }
        self.diagnostics.push(diagnostic.build());
    }

    /// A chain of labels (`a: b: stmt`) is emitted together so a loop at its
    /// end answers to every name.
    fn labeled(&mut self, label: &str, body: &Stmt) {
        let mut labels = vec![label.to_string()];
        let mut body = body;
        while let Stmt::Labeled { label, body: inner } = body {
            labels.push(label.clone());
            body = inner.as_ref();
        }

        for _ in &labels {
            self.open("do");
        }
        if body.is_loop() {
            self.loop_stmt(body, &labels);
        } else {
            for label in &labels {
                self.control.push(ControlFrame::Labeled(label.clone()));
            }
            match body {
                // `return` must end its block; the landing label follows it
                Stmt::Return(_) => {
                    self.open("do");
                    self.stmt(body);
                    self.close("end");
                }
                other => self.stmt(other),
            }
            for _ in &labels {
                self.control.pop();
            }
        }
        for label in labels.iter().rev() {
            self.line(format!("::{}__After::", escape_ident(label)));
            self.close("end");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use jslua_diagnostics::DiagnosticCode;

    #[test]
    fn test_statement_sinking() {
        assert_eq!(
            lines("a = 1; f(); 1 + 2; x; (function () {})();"),
            vec![
                "a = 1",
                "f()",
                "__Sink(__PlusOp(1, 2))",
                "__Sink(x)",
                ";(__DefineFunction(function (self)",
                "end))()",
            ]
        );
    }

    #[test]
    fn test_throw_and_if_chain() {
        assert_eq!(
            lines("if (a) throw x; else if (b) f(); else g();"),
            vec![
                "if __ToBoolean(a) then",
                "error({[\"data\"]=x})",
                "elseif __ToBoolean(b) then",
                "f()",
                "else",
                "g()",
                "end",
            ]
        );
    }

    #[test]
    fn test_for_loop_shape() {
        assert_eq!(
            lines("for (var i = 0; i < 10; i++) { f(i); }"),
            vec![
                "local i",
                "i = 0",
                "while __ToBoolean((i < 10)) do",
                "do",
                "f(i)",
                "end",
                "i = __PlusOp(i, 1)",
                "end",
            ]
        );
    }

    #[test]
    fn test_continue_lands_before_update() {
        assert_eq!(
            lines("for (;;) { if (a) continue; f(); }"),
            vec![
                "while true do",
                "do",
                "if __ToBoolean(a) then",
                "goto __Continue1",
                "end",
                "f()",
                "end",
                "::__Continue1::",
                "end",
            ]
        );
    }

    #[test]
    fn test_nested_loops_get_separate_continue_labels() {
        let out = lines("while (a) { while (b) { continue; } continue; }");
        assert_eq!(
            out,
            vec![
                "while __ToBoolean(a) do",
                "do",
                "while __ToBoolean(b) do",
                "do",
                "goto __Continue1",
                "end",
                "::__Continue1::",
                "end",
                "goto __Continue2",
                "end",
                "::__Continue2::",
                "end",
            ]
        );
    }

    #[test]
    fn test_do_while() {
        assert_eq!(
            lines("do { f(); } while (a);"),
            vec!["repeat", "do", "f()", "end", "until not __ToBoolean(a)"]
        );
    }

    #[test]
    fn test_labeled_break_and_continue() {
        let out = lines("outer: for (;;) { while (b) { if (c) continue outer; break outer; } }");
        assert_eq!(
            out,
            vec![
                "do",
                "while true do",
                "do",
                "while __ToBoolean(b) do",
                "do",
                "if __ToBoolean(c) then",
                "goto outer",
                "end",
                "goto outer__After",
                "end",
                "end",
                "end",
                "::outer::",
                "end",
                "::outer__After::",
                "end",
            ]
        );
    }

    #[test]
    fn test_stacked_labels_on_a_loop() {
        let translation = translate("a: b: while (x) { if (y) continue a; f(); }");
        assert!(translation.diagnostics.is_empty());
        let out: Vec<&str> = translation.lua.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(
            out,
            vec![
                "do",
                "do",
                "while __ToBoolean(x) do",
                "do",
                "if __ToBoolean(y) then",
                "goto a",
                "end",
                "f()",
                "end",
                "::a::",
                "::b::",
                "end",
                "::b__After::",
                "end",
                "::a__After::",
                "end",
            ]
        );
    }

    #[test]
    fn test_labeled_block() {
        assert_eq!(
            lines("done: { f(); break done; g(); }"),
            vec![
                "do",
                "do",
                "f()",
                "goto done__After",
                "g()",
                "end",
                "::done__After::",
                "end",
            ]
        );
    }

    #[test]
    fn test_for_in_targets() {
        assert_eq!(
            lines("for (var k in o) { f(k); }"),
            vec![
                "local k",
                "for k, __tmp1 in __Iterate(o) do",
                "do",
                "f(k)",
                "end",
                "end",
            ]
        );
        assert_eq!(
            lines("for (o.k in p) ;"),
            vec![
                "for __tmp2, __tmp1 in __Iterate(p) do",
                "o.k = __tmp2",
                "do",
                "end",
                "end",
            ]
        );
    }

    #[test]
    fn test_switch() {
        assert_eq!(
            lines("switch (x) { case 1: f(); case 2: g(); break; default: h(); }"),
            vec![
                "repeat",
                "local __tmp1 = x",
                "local __tmp2 = 0",
                "if rawequal(__tmp1, 1) then __tmp2 = 1",
                "elseif rawequal(__tmp1, 2) then __tmp2 = 2",
                "else __tmp2 = 3",
                "end",
                "if __tmp2 ~= 0 and __tmp2 <= 1 then",
                "f()",
                "end",
                "if __tmp2 ~= 0 and __tmp2 <= 2 then",
                "g()",
                "break",
                "end",
                "if __tmp2 ~= 0 and __tmp2 <= 3 then",
                "h()",
                "end",
                "until true",
            ]
        );
    }

    #[test]
    fn test_try_catch_finally_protocol() {
        let translation = translate_with(
            "function f() { try { return g(); } catch (e) { h(e); } finally { done(); } }",
            &crate::EmitOptions {
                markers: true,
                ..plain_options()
            },
        );
        let out: Vec<&str> = translation.lua.lines().map(str::trim).collect();
        let expected = [
            "do",
            "-- TryBody",
            "local __TryStatus1, __TryReturnValue2 = pcall(function ()",
            "return g()",
            "end)",
            "-- Finally",
            "local __TryFinalizer4 = (function ()",
            "done()",
            "end)",
            "-- Catch",
            "local __TryHandler5 = (function (e)",
            "h(e)",
            "end)",
            "-- EarlyReturn",
            "if __TryStatus1 and nil ~= __TryReturnValue2 then",
            "__TryFinalizer4()",
            "return __TryReturnValue2",
            "end",
            "-- CheckCatch",
            "if not __TryStatus1 then",
            "local __CatchReturnValue3 = __TryHandler5(__TryReturnValue2.data or __TryReturnValue2)",
            "__TryFinalizer4()",
            "return __CatchReturnValue3",
            "end",
            "-- JustFinalizer",
            "__TryFinalizer4()",
            "end",
        ];
        let start = out.iter().position(|l| *l == "do").unwrap();
        assert_eq!(&out[start..start + expected.len()], &expected[..]);
    }

    #[test]
    fn test_catch_result_returned_unconditionally() {
        // a handler that completes normally still ends the enclosing function
        let out = lines("function f() { try { g(); } catch (e) { } after(); }");
        let dispatch = out.iter().position(|l| l == "if not __TryStatus1 then").unwrap();
        assert_eq!(
            &out[dispatch..dispatch + 4],
            &[
                "if not __TryStatus1 then",
                "local __CatchReturnValue3 = __TryHandler5(__TryReturnValue2.data or __TryReturnValue2)",
                "return __CatchReturnValue3",
                "end",
            ]
        );
        assert!(out.contains(&"after()".to_string()));
    }

    #[test]
    fn test_return_null_from_try_is_a_value() {
        let out = lines("function f() { try { return null; } catch (e) {} g(); }");
        let body = out.iter().position(|l| l.ends_with("= pcall(function ()")).unwrap();
        assert_eq!(out[body + 1], "return null");
        assert!(out.contains(&"if __TryStatus1 and nil ~= __TryReturnValue2 then".to_string()));
    }

    #[test]
    fn test_try_finally_rethrows() {
        let out = lines("try { g(); } finally { h(); }");
        assert!(out.contains(&"__TryFinalizer4()".to_string()));
        assert!(out.contains(&"error(__TryReturnValue2, 0)".to_string()));
        assert!(!out.iter().any(|l| l.contains("__TryHandler5")));
    }

    #[test]
    fn test_nested_try_names_do_not_collide() {
        let out = lines("try { try { a(); } catch (e) {} } catch (e) {}").join("\n");
        assert!(out.contains("__TryStatus1"));
        assert!(out.contains("__TryStatus6"));
    }

    #[test]
    fn test_break_out_of_try_is_blocked() {
        let translation = translate("while (a) { try { break; } catch (e) {} }");
        assert!(translation.lua.contains("--[[BreakStatement]]"));
        assert!(translation.diagnostics.contains(DiagnosticCode::UnsupportedStatement));
    }

    #[test]
    fn test_with_statement_hint() {
        let translation = translate("with (o) { f(x); }");
        let out: Vec<&str> = translation.lua.lines().map(str::trim).collect();
        assert_eq!(out, vec!["do", "local __tmp1 = __ToObject(o)", "f(x)", "end"]);
        let hint = translation
            .diagnostics
            .iter()
            .find(|d| d.code == DiagnosticCode::PartialWithScope)
            .unwrap();
        assert!(hint.is_hint());
        assert_eq!(hint.help.as_deref(), Some("affected names: f, x"));
    }

    #[test]
    fn test_multiple_catch_marker() {
        use jslua_hir::{CatchClause, Program, Stmt};
        let clause = |param: &str| CatchClause {
            param: Some(param.to_string()),
            body: vec![],
        };
        let program = Program {
            body: vec![Stmt::Try {
                block: vec![],
                handlers: vec![clause("a"), clause("b")],
                finalizer: None,
                span: Default::default(),
            }],
        };
        let translation = crate::emit_program(&program, &plain_options());
        assert!(translation.lua.contains("--[[MultipleCatchClauses]]"));
        assert!(translation.lua.contains("(function (a)"));
        assert!(translation.diagnostics.contains(DiagnosticCode::MultipleCatchClauses));
    }
}
