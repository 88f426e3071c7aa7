//! Variable and function declaration hoisting
//!
//! After this pass every function body (and the program root) has the shape
//!
//! ```text
//! var a, b, c;          // one binding-only declaration, if any names remain
//! function f() { ... }  // every function declaration, in source order
//! function g() { ... }
//! ...rest               // initializers rewritten as assignments
//! ```
//!
//! Declarations never cross a function boundary: each nested function body is
//! hoisted on its own. `let` and `const` are treated as `var`.

use std::collections::HashSet;

use jslua_hir::{
    CatchClause, Expr, ForInLeft, ForInit, Function, Program, PropKey, MemberProp, Stmt,
    SwitchCase, VarDeclarator, VarKind,
};

/// Hoist declarations in the program root and in every function it contains.
pub fn hoist_program(mut program: Program) -> Program {
    let body = std::mem::take(&mut program.body);
    program.body = hoist_body(body, &[]);
    log::debug!("hoisted program root into {} statements", program.body.len());
    program
}

/// Hoist a single function in place.
pub fn hoist_function(func: &mut Function) {
    let body = std::mem::take(&mut func.body);
    func.body = hoist_body(body, &func.params);
}

/// Declarations pulled out of one body.
#[derive(Default)]
struct Hoisted {
    vars: Vec<String>,
    seen: HashSet<String>,
    funcs: Vec<Function>,
}

impl Hoisted {
    fn declare(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.vars.push(name.to_string());
        }
    }
}

fn hoist_body(body: Vec<Stmt>, params: &[String]) -> Vec<Stmt> {
    let mut hoisted = Hoisted::default();
    let rest = rewrite_stmts(body, &mut hoisted);

    let func_names: HashSet<&str> = hoisted
        .funcs
        .iter()
        .filter_map(|f| f.name.as_deref())
        .collect();
    let decls: Vec<VarDeclarator> = hoisted
        .vars
        .iter()
        .filter(|name| !func_names.contains(name.as_str()) && !params.contains(name))
        .map(|name| VarDeclarator {
            name: name.clone(),
            init: None,
        })
        .collect();

    let mut out = Vec::with_capacity(rest.len() + hoisted.funcs.len() + 1);
    if !decls.is_empty() {
        out.push(Stmt::VarDecl {
            kind: VarKind::Var,
            decls,
        });
    }
    out.extend(hoisted.funcs.into_iter().map(Stmt::FnDecl));
    out.extend(rest);
    out
}

fn rewrite_stmts(stmts: Vec<Stmt>, hoisted: &mut Hoisted) -> Vec<Stmt> {
    stmts
        .into_iter()
        .filter_map(|stmt| rewrite_stmt(stmt, hoisted))
        .collect()
}

/// Rewrite a statement that sits in a single-statement position, where
/// removal must leave an empty statement behind.
fn rewrite_single(stmt: Box<Stmt>, hoisted: &mut Hoisted) -> Box<Stmt> {
    Box::new(rewrite_stmt(*stmt, hoisted).unwrap_or(Stmt::Empty))
}

/// Returns `None` when the statement leaves nothing behind.
fn rewrite_stmt(stmt: Stmt, hoisted: &mut Hoisted) -> Option<Stmt> {
    let stmt = match stmt {
        Stmt::VarDecl { decls, .. } => return initializers(decls, hoisted).map(Stmt::Expr),
        Stmt::FnDecl(mut func) => {
            hoist_function(&mut func);
            hoisted.funcs.push(func);
            return None;
        }
        Stmt::Empty | Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unsupported(_) => stmt,
        Stmt::Expr(expr) => Stmt::Expr(rewrite_expr(expr)),
        Stmt::Return(arg) => Stmt::Return(arg.map(rewrite_expr)),
        Stmt::Throw(arg) => Stmt::Throw(rewrite_expr(arg)),
        Stmt::If { test, cons, alt } => Stmt::If {
            test: rewrite_expr(test),
            cons: rewrite_single(cons, hoisted),
            alt: alt.map(|alt| rewrite_single(alt, hoisted)),
        },
        Stmt::While { test, body } => Stmt::While {
            test: rewrite_expr(test),
            body: rewrite_single(body, hoisted),
        },
        Stmt::DoWhile { body, test } => Stmt::DoWhile {
            body: rewrite_single(body, hoisted),
            test: rewrite_expr(test),
        },
        Stmt::For { init, test, update, body } => {
            let init = match init {
                Some(ForInit::VarDecl { decls, .. }) => initializers(decls, hoisted).map(ForInit::Expr),
                Some(ForInit::Expr(expr)) => Some(ForInit::Expr(rewrite_expr(expr))),
                None => None,
            };
            Stmt::For {
                init,
                test: test.map(rewrite_expr),
                update: update.map(rewrite_expr),
                body: rewrite_single(body, hoisted),
            }
        }
        Stmt::ForIn { left, right, body } => {
            let left = match left {
                ForInLeft::VarDecl { name, .. } => {
                    hoisted.declare(&name);
                    ForInLeft::Target(Expr::Ident(name))
                }
                ForInLeft::Target(target) => ForInLeft::Target(rewrite_expr(target)),
            };
            Stmt::ForIn {
                left,
                right: rewrite_expr(right),
                body: rewrite_single(body, hoisted),
            }
        }
        Stmt::Switch { discriminant, cases } => Stmt::Switch {
            discriminant: rewrite_expr(discriminant),
            cases: cases
                .into_iter()
                .map(|case| SwitchCase {
                    test: case.test.map(rewrite_expr),
                    body: rewrite_stmts(case.body, hoisted),
                })
                .collect(),
        },
        Stmt::Try { block, handlers, finalizer, span } => Stmt::Try {
            block: rewrite_stmts(block, hoisted),
            handlers: handlers
                .into_iter()
                .map(|handler| CatchClause {
                    param: handler.param,
                    body: rewrite_stmts(handler.body, hoisted),
                })
                .collect(),
            finalizer: finalizer.map(|stmts| rewrite_stmts(stmts, hoisted)),
            span,
        },
        Stmt::With { object, body, span } => Stmt::With {
            object: rewrite_expr(object),
            body: rewrite_single(body, hoisted),
            span,
        },
        Stmt::Labeled { label, body } => Stmt::Labeled {
            label,
            body: rewrite_single(body, hoisted),
        },
        Stmt::Block(stmts) => Stmt::Block(rewrite_stmts(stmts, hoisted)),
    };
    Some(stmt)
}

/// Register the declared names and turn the initializers into one expression.
fn initializers(decls: Vec<VarDeclarator>, hoisted: &mut Hoisted) -> Option<Expr> {
    let mut assigns = Vec::new();
    for decl in decls {
        hoisted.declare(&decl.name);
        if let Some(init) = decl.init {
            assigns.push(Expr::assign(Expr::Ident(decl.name), rewrite_expr(init)));
        }
    }
    match assigns.len() {
        0 => None,
        1 => assigns.pop(),
        _ => Some(Expr::Seq(assigns)),
    }
}

/// Hoist the bodies of function literals nested anywhere in `expr`.
fn rewrite_expr(mut expr: Expr) -> Expr {
    visit_functions(&mut expr);
    expr
}

fn visit_functions(expr: &mut Expr) {
    match expr {
        Expr::Function(func) => hoist_function(func),
        Expr::Ident(_) | Expr::This | Expr::Lit(_) | Expr::Unsupported(_) => {}
        Expr::Array(elems) => {
            for elem in elems.iter_mut().flatten() {
                visit_functions(elem);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                if let PropKey::Computed(key) = &mut prop.key {
                    visit_functions(key);
                }
                visit_functions(&mut prop.value);
            }
        }
        Expr::Unary { arg, .. } | Expr::Update { arg, .. } => visit_functions(arg),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            visit_functions(left);
            visit_functions(right);
        }
        Expr::Assign { target, value, .. } => {
            visit_functions(target);
            visit_functions(value);
        }
        Expr::Cond { test, cons, alt } => {
            visit_functions(test);
            visit_functions(cons);
            visit_functions(alt);
        }
        Expr::Call { callee, args } | Expr::New { callee, args } => {
            visit_functions(callee);
            for arg in args {
                visit_functions(arg);
            }
        }
        Expr::Member { object, prop } => {
            visit_functions(object);
            if let MemberProp::Computed(key) = prop {
                visit_functions(key);
            }
        }
        Expr::Seq(exprs) => {
            for expr in exprs {
                visit_functions(expr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jslua_diagnostics::Diagnostics;
    use jslua_hir::lower_script;
    use jslua_parser::SpanMapper;

    fn hoisted(source: &str) -> Program {
        let script = jslua_parser::parse_script(source).unwrap();
        hoist_program(lower_script(&script, SpanMapper::dummy(), &mut Diagnostics::new()))
    }

    fn leading_names(body: &[Stmt]) -> Vec<String> {
        match body.first() {
            Some(Stmt::VarDecl { decls, .. }) => decls.iter().map(|d| d.name.clone()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_single_leading_declaration() {
        let program = hoisted("f(); var a = 1; if (x) { var b; var a = 2; } var c, d = 3;");
        assert_eq!(leading_names(&program.body), vec!["a", "b", "c", "d"]);
        let Stmt::VarDecl { decls, .. } = &program.body[0] else {
            panic!("expected leading declaration");
        };
        assert!(decls.iter().all(|d| d.init.is_none()));

        assert!(matches!(&program.body[1], Stmt::Expr(Expr::Call { .. })));
        assert_eq!(program.body[2], Stmt::Expr(Expr::assign(Expr::ident("a"), Expr::num(1.0))));
        let Stmt::If { cons, .. } = &program.body[3] else {
            panic!("expected if");
        };
        // `var b;` leaves nothing behind
        assert_eq!(
            **cons,
            Stmt::Block(vec![Stmt::Expr(Expr::assign(Expr::ident("a"), Expr::num(2.0)))])
        );
        assert_eq!(program.body[4], Stmt::Expr(Expr::assign(Expr::ident("d"), Expr::num(3.0))));
        assert_eq!(program.body.len(), 5);
    }

    #[test]
    fn test_multiple_initializers_become_sequence() {
        let program = hoisted("var a = 1, b = 2;");
        assert_eq!(
            program.body[1],
            Stmt::Expr(Expr::Seq(vec![
                Expr::assign(Expr::ident("a"), Expr::num(1.0)),
                Expr::assign(Expr::ident("b"), Expr::num(2.0)),
            ]))
        );
    }

    #[test]
    fn test_functions_follow_declaration_in_order() {
        let program = hoisted("var x = g(); function g() { return 1; } if (y) { function h() {} }");
        assert_eq!(leading_names(&program.body), vec!["x"]);
        let names: Vec<_> = program
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::FnDecl(f) => f.name.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["g", "h"]);
        assert!(matches!(program.body[1], Stmt::FnDecl(_)));
        assert!(matches!(program.body[2], Stmt::FnDecl(_)));
        // the emptied block stays in place
        let Stmt::If { cons, .. } = &program.body[4] else {
            panic!("expected if");
        };
        assert_eq!(**cons, Stmt::Block(Vec::new()));
    }

    #[test]
    fn test_function_and_parameter_names_not_redeclared() {
        let program = hoisted("function f(p) { var p = 1; var q; function q() {} }");
        let Stmt::FnDecl(f) = &program.body[0] else {
            panic!("expected function");
        };
        assert!(leading_names(&f.body).is_empty());
        assert!(matches!(&f.body[0], Stmt::FnDecl(inner) if inner.name.as_deref() == Some("q")));
        assert_eq!(f.body[1], Stmt::Expr(Expr::assign(Expr::ident("p"), Expr::num(1.0))));
    }

    #[test]
    fn test_nested_function_literals_hoisted_separately() {
        let program = hoisted("var h = function () { x(); var inner = 1; }; var outer;");
        assert_eq!(leading_names(&program.body), vec!["h", "outer"]);
        let Stmt::Expr(Expr::Assign { value, .. }) = &program.body[1] else {
            panic!("expected assignment");
        };
        let Expr::Function(func) = value.as_ref() else {
            panic!("expected function literal");
        };
        assert_eq!(leading_names(&func.body), vec!["inner"]);
    }

    #[test]
    fn test_loop_heads() {
        let program = hoisted("for (var i = 0, j; i < 3; i++) {} for (var k in o) {} for (var n; ;) {}");
        assert_eq!(leading_names(&program.body), vec!["i", "j", "k", "n"]);
        assert!(matches!(
            &program.body[1],
            Stmt::For { init: Some(ForInit::Expr(Expr::Assign { .. })), .. }
        ));
        assert!(matches!(
            &program.body[2],
            Stmt::ForIn { left: ForInLeft::Target(Expr::Ident(k)), .. } if k == "k"
        ));
        assert!(matches!(&program.body[3], Stmt::For { init: None, .. }));
    }

    #[test]
    fn test_let_and_const_are_function_scoped() {
        let program = hoisted("{ let a = 1; const b = 2; }");
        assert_eq!(leading_names(&program.body), vec!["a", "b"]);
    }

    #[test]
    fn test_idempotent() {
        let once = hoisted(
            "var a = 1; function f(x) { var y = x; function g() { return y; } return g; } \
             for (var k in o) { var z; } try { var t = 2; } catch (e) {}",
        );
        let twice = hoist_program(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_declarations_no_leading_statement() {
        let program = hoisted("f(1);");
        assert_eq!(program.body.len(), 1);
        assert!(matches!(program.body[0], Stmt::Expr(_)));
    }
}
