//! Declaration analysis over a statement list.

use std::collections::{BTreeSet, HashSet};

use crate::ir::*;

/// Names declared and referenced by a function body or program root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationInfo {
    /// `var`/`let`/`const` bindings, including `for` and `for-in` heads
    pub vars: BTreeSet<String>,
    /// Function declaration names
    pub funcs: BTreeSet<String>,
    /// Every identifier read or written, nested functions included
    pub referenced: HashSet<String>,
}

impl DeclarationInfo {
    pub fn references(&self, name: &str) -> bool {
        self.referenced.contains(name)
    }
}

/// Collect declarations and references in `body`.
///
/// Declarations stop at function boundaries; references do not.
pub fn analyze(body: &[Stmt]) -> DeclarationInfo {
    let mut collector = Collector::default();
    for stmt in body {
        collector.stmt(stmt, true);
    }
    collector.info
}

/// Identifiers referenced anywhere in a function, parameters excluded.
pub fn function_references(func: &Function) -> HashSet<String> {
    let mut collector = Collector::default();
    for stmt in &func.body {
        collector.stmt(stmt, false);
    }
    collector.info.referenced
}

#[derive(Default)]
struct Collector {
    info: DeclarationInfo,
}

impl Collector {
    /// `declaring` is false once inside a nested function.
    fn stmt(&mut self, stmt: &Stmt, declaring: bool) {
        match stmt {
            Stmt::Empty | Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unsupported(_) => {}
            Stmt::Expr(expr) | Stmt::Throw(expr) => self.expr(expr),
            Stmt::VarDecl { decls, .. } => self.declarators(decls, declaring),
            Stmt::FnDecl(func) => {
                if declaring {
                    if let Some(name) = &func.name {
                        self.info.funcs.insert(name.clone());
                    }
                }
                self.function(func);
            }
            Stmt::Return(arg) => {
                if let Some(arg) = arg {
                    self.expr(arg);
                }
            }
            Stmt::If { test, cons, alt } => {
                self.expr(test);
                self.stmt(cons, declaring);
                if let Some(alt) = alt {
                    self.stmt(alt, declaring);
                }
            }
            Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
                self.expr(test);
                self.stmt(body, declaring);
            }
            Stmt::For { init, test, update, body } => {
                match init {
                    Some(ForInit::VarDecl { decls, .. }) => self.declarators(decls, declaring),
                    Some(ForInit::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                for expr in test.iter().chain(update.iter()) {
                    self.expr(expr);
                }
                self.stmt(body, declaring);
            }
            Stmt::ForIn { left, right, body } => {
                match left {
                    ForInLeft::VarDecl { name, .. } => {
                        if declaring {
                            self.info.vars.insert(name.clone());
                        }
                        self.info.referenced.insert(name.clone());
                    }
                    ForInLeft::Target(target) => self.expr(target),
                }
                self.expr(right);
                self.stmt(body, declaring);
            }
            Stmt::Switch { discriminant, cases } => {
                self.expr(discriminant);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    self.stmts(&case.body, declaring);
                }
            }
            Stmt::Try { block, handlers, finalizer, .. } => {
                self.stmts(block, declaring);
                for handler in handlers {
                    self.stmts(&handler.body, declaring);
                }
                if let Some(finalizer) = finalizer {
                    self.stmts(finalizer, declaring);
                }
            }
            Stmt::With { object, body, .. } => {
                self.expr(object);
                self.stmt(body, declaring);
            }
            Stmt::Labeled { body, .. } => self.stmt(body, declaring),
            Stmt::Block(stmts) => self.stmts(stmts, declaring),
        }
    }

    fn stmts(&mut self, stmts: &[Stmt], declaring: bool) {
        for stmt in stmts {
            self.stmt(stmt, declaring);
        }
    }

    fn declarators(&mut self, decls: &[VarDeclarator], declaring: bool) {
        for decl in decls {
            if declaring {
                self.info.vars.insert(decl.name.clone());
            }
            if let Some(init) = &decl.init {
                self.expr(init);
            }
        }
    }

    fn function(&mut self, func: &Function) {
        for stmt in &func.body {
            self.stmt(stmt, false);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => {
                self.info.referenced.insert(name.clone());
            }
            Expr::This | Expr::Lit(_) | Expr::Unsupported(_) => {}
            Expr::Array(elems) => {
                for elem in elems.iter().flatten() {
                    self.expr(elem);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    if let PropKey::Computed(key) = &prop.key {
                        self.expr(key);
                    }
                    self.expr(&prop.value);
                }
            }
            Expr::Function(func) => self.function(func),
            Expr::Unary { arg, .. } | Expr::Update { arg, .. } => self.expr(arg),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Expr::Cond { test, cons, alt } => {
                self.expr(test);
                self.expr(cons);
                self.expr(alt);
            }
            Expr::Call { callee, args } | Expr::New { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Member { object, prop } => {
                self.expr(object);
                if let MemberProp::Computed(key) = prop {
                    self.expr(key);
                }
            }
            Expr::Seq(exprs) => {
                for expr in exprs {
                    self.expr(expr);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower_script;
    use jslua_diagnostics::Diagnostics;
    use jslua_parser::SpanMapper;

    fn body(source: &str) -> Vec<Stmt> {
        let script = jslua_parser::parse_script(source).unwrap();
        lower_script(&script, SpanMapper::dummy(), &mut Diagnostics::new()).body
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(analyze(&[]), DeclarationInfo::default());
    }

    #[test]
    fn test_declarations_do_not_cross_functions() {
        let info = analyze(&body(
            "var a = 1; function f() { var inner; return outer; } if (x) { let b; }",
        ));
        assert_eq!(names(&info.vars), vec!["a", "b"]);
        assert_eq!(names(&info.funcs), vec!["f"]);
        assert!(!info.vars.contains("inner"));
        assert!(info.references("outer"));
        assert!(info.references("x"));
    }

    #[test]
    fn test_loop_heads_and_nested_blocks() {
        let info = analyze(&body(
            "for (var i = 0; i < n; i++) {} for (var k in o) {} \
             try { var t; } catch (e) { var c; } finally { var z; } \
             switch (s) { case 1: var sw; } with (w) { var inWith; } \
             lbl: while (1) { var inLoop; }",
        ));
        assert_eq!(
            names(&info.vars),
            vec!["c", "i", "inLoop", "inWith", "k", "sw", "t", "z"]
        );
    }

    #[test]
    fn test_references_cross_function_literals() {
        let info = analyze(&body("var g = function () { return arguments[0] + y; };"));
        assert!(info.references("arguments"));
        assert!(info.references("y"));
        assert!(info.funcs.is_empty());
    }

    #[test]
    fn test_function_references() {
        let program = body("(function fact(n) { return n && fact(n - 1); });");
        let Stmt::Expr(Expr::Function(func)) = &program[0] else {
            panic!("expected function expression");
        };
        let refs = function_references(func);
        assert!(refs.contains("fact"));
        assert!(refs.contains("n"));
    }
}
