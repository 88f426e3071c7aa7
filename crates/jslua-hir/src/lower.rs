//! SWC AST to translator tree lowering
//!
//! Lowering never fails: constructs outside the supported subset become
//! [`Unsupported`] nodes tagged with their ESTree name, and the emitter
//! reports them when it reaches them.

use jslua_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Span};
use jslua_parser::{SpanMapper, Spanned};
use swc_ecma_ast as ast;

use crate::ir::*;

/// Lower a parsed script.
///
/// `diagnostics` receives hints about constructs that lower but cannot be
/// translated faithfully (direct `eval`).
pub fn lower_script(script: &ast::Script, spans: SpanMapper, diagnostics: &mut Diagnostics) -> Program {
    let mut ctx = LoweringContext { spans, diagnostics };
    let body = ctx.lower_stmts(&script.body);
    log::debug!("lowered {} top-level statements", body.len());
    Program { body }
}

struct LoweringContext<'a> {
    spans: SpanMapper,
    diagnostics: &'a mut Diagnostics,
}

impl LoweringContext<'_> {
    fn span(&self, node: &impl Spanned) -> Span {
        self.spans.map(node.span())
    }

    fn unsupported(&self, kind: &'static str, category: UnsupportedCategory, node: &impl Spanned) -> Unsupported {
        Unsupported::new(kind, category, self.span(node))
    }

    fn lower_stmts(&mut self, stmts: &[ast::Stmt]) -> Vec<Stmt> {
        stmts.iter().map(|s| self.lower_stmt(s)).collect()
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Stmt {
        match stmt {
            ast::Stmt::Block(block) => Stmt::Block(self.lower_stmts(&block.stmts)),
            ast::Stmt::Empty(_) | ast::Stmt::Debugger(_) => Stmt::Empty,
            ast::Stmt::With(with) => Stmt::With {
                object: self.lower_expr(&with.obj),
                body: Box::new(self.lower_stmt(&with.body)),
                span: self.span(with),
            },
            ast::Stmt::Return(ret) => Stmt::Return(ret.arg.as_ref().map(|e| self.lower_expr(e))),
            ast::Stmt::Labeled(labeled) => Stmt::Labeled {
                label: labeled.label.sym.to_string(),
                body: Box::new(self.lower_stmt(&labeled.body)),
            },
            ast::Stmt::Break(brk) => Stmt::Break {
                label: brk.label.as_ref().map(|l| l.sym.to_string()),
                span: self.span(brk),
            },
            ast::Stmt::Continue(cont) => Stmt::Continue {
                label: cont.label.as_ref().map(|l| l.sym.to_string()),
                span: self.span(cont),
            },
            ast::Stmt::If(if_stmt) => Stmt::If {
                test: self.lower_expr(&if_stmt.test),
                cons: Box::new(self.lower_stmt(&if_stmt.cons)),
                alt: if_stmt.alt.as_ref().map(|s| Box::new(self.lower_stmt(s))),
            },
            ast::Stmt::Switch(switch) => Stmt::Switch {
                discriminant: self.lower_expr(&switch.discriminant),
                cases: switch
                    .cases
                    .iter()
                    .map(|case| SwitchCase {
                        test: case.test.as_ref().map(|t| self.lower_expr(t)),
                        body: self.lower_stmts(&case.cons),
                    })
                    .collect(),
            },
            ast::Stmt::Throw(throw) => Stmt::Throw(self.lower_expr(&throw.arg)),
            ast::Stmt::Try(try_stmt) => self.lower_try(try_stmt),
            ast::Stmt::While(while_stmt) => Stmt::While {
                test: self.lower_expr(&while_stmt.test),
                body: Box::new(self.lower_stmt(&while_stmt.body)),
            },
            ast::Stmt::DoWhile(do_while) => Stmt::DoWhile {
                body: Box::new(self.lower_stmt(&do_while.body)),
                test: self.lower_expr(&do_while.test),
            },
            ast::Stmt::For(for_stmt) => {
                let init = for_stmt.init.as_ref().map(|init| match init {
                    ast::VarDeclOrExpr::VarDecl(var_decl) => match self.lower_var_decl(var_decl) {
                        Ok((kind, decls)) => ForInit::VarDecl { kind, decls },
                        Err(unsupported) => ForInit::Expr(Expr::Unsupported(unsupported)),
                    },
                    ast::VarDeclOrExpr::Expr(expr) => ForInit::Expr(self.lower_expr(expr)),
                });
                Stmt::For {
                    init,
                    test: for_stmt.test.as_ref().map(|e| self.lower_expr(e)),
                    update: for_stmt.update.as_ref().map(|e| self.lower_expr(e)),
                    body: Box::new(self.lower_stmt(&for_stmt.body)),
                }
            }
            ast::Stmt::ForIn(for_in) => self.lower_for_in(for_in),
            ast::Stmt::ForOf(for_of) => Stmt::Unsupported(self.unsupported(
                "ForOfStatement",
                UnsupportedCategory::Statement,
                for_of,
            )),
            ast::Stmt::Decl(decl) => self.lower_decl(decl),
            ast::Stmt::Expr(expr_stmt) => Stmt::Expr(self.lower_expr(&expr_stmt.expr)),
        }
    }

    fn lower_try(&mut self, try_stmt: &ast::TryStmt) -> Stmt {
        let handlers = match &try_stmt.handler {
            Some(clause) => {
                let param = match &clause.param {
                    None => None,
                    Some(ast::Pat::Ident(binding)) => Some(binding.id.sym.to_string()),
                    Some(pat) => {
                        return Stmt::Unsupported(self.unsupported(
                            pattern_kind(pat),
                            UnsupportedCategory::Pattern,
                            pat,
                        ))
                    }
                };
                vec![CatchClause {
                    param,
                    body: self.lower_stmts(&clause.body.stmts),
                }]
            }
            None => Vec::new(),
        };

        Stmt::Try {
            block: self.lower_stmts(&try_stmt.block.stmts),
            handlers,
            finalizer: try_stmt
                .finalizer
                .as_ref()
                .map(|block| self.lower_stmts(&block.stmts)),
            span: self.span(try_stmt),
        }
    }

    fn lower_for_in(&mut self, for_in: &ast::ForInStmt) -> Stmt {
        let left = match &for_in.left {
            ast::ForHead::VarDecl(var_decl) => {
                let kind = var_kind(var_decl.kind);
                match var_decl.decls.first().map(|d| &d.name) {
                    Some(ast::Pat::Ident(binding)) => ForInLeft::VarDecl {
                        kind,
                        name: binding.id.sym.to_string(),
                    },
                    Some(pat) => {
                        return Stmt::Unsupported(self.unsupported(
                            pattern_kind(pat),
                            UnsupportedCategory::Pattern,
                            pat,
                        ))
                    }
                    None => {
                        return Stmt::Unsupported(self.unsupported(
                            "ForInStatement",
                            UnsupportedCategory::Statement,
                            for_in,
                        ))
                    }
                }
            }
            ast::ForHead::Pat(pat) => match pat.as_ref() {
                ast::Pat::Ident(binding) => ForInLeft::Target(Expr::Ident(binding.id.sym.to_string())),
                ast::Pat::Expr(expr) => ForInLeft::Target(self.lower_expr(expr)),
                other => {
                    return Stmt::Unsupported(self.unsupported(
                        pattern_kind(other),
                        UnsupportedCategory::Pattern,
                        other,
                    ))
                }
            },
            ast::ForHead::UsingDecl(using) => {
                return Stmt::Unsupported(self.unsupported(
                    "UsingDeclaration",
                    UnsupportedCategory::Statement,
                    using.as_ref(),
                ))
            }
        };

        Stmt::ForIn {
            left,
            right: self.lower_expr(&for_in.right),
            body: Box::new(self.lower_stmt(&for_in.body)),
        }
    }

    fn lower_decl(&mut self, decl: &ast::Decl) -> Stmt {
        match decl {
            ast::Decl::Fn(fn_decl) => {
                match self.lower_function(Some(fn_decl.ident.sym.to_string()), &fn_decl.function) {
                    Ok(func) => Stmt::FnDecl(func),
                    Err(unsupported) => Stmt::Unsupported(unsupported),
                }
            }
            ast::Decl::Var(var_decl) => match self.lower_var_decl(var_decl) {
                Ok((kind, decls)) => Stmt::VarDecl { kind, decls },
                Err(unsupported) => Stmt::Unsupported(unsupported),
            },
            ast::Decl::Class(class) => Stmt::Unsupported(self.unsupported(
                "ClassDeclaration",
                UnsupportedCategory::Statement,
                &*class.class,
            )),
            ast::Decl::Using(using) => Stmt::Unsupported(self.unsupported(
                "UsingDeclaration",
                UnsupportedCategory::Statement,
                using.as_ref(),
            )),
            other => Stmt::Unsupported(self.unsupported(
                "TypeScriptDeclaration",
                UnsupportedCategory::Statement,
                other,
            )),
        }
    }

    fn lower_var_decl(&mut self, var_decl: &ast::VarDecl) -> Result<(VarKind, Vec<VarDeclarator>), Unsupported> {
        let mut decls = Vec::with_capacity(var_decl.decls.len());
        for declarator in &var_decl.decls {
            let name = match &declarator.name {
                ast::Pat::Ident(binding) => binding.id.sym.to_string(),
                pat => {
                    return Err(self.unsupported(pattern_kind(pat), UnsupportedCategory::Pattern, pat))
                }
            };
            decls.push(VarDeclarator {
                name,
                init: declarator.init.as_ref().map(|e| self.lower_expr(e)),
            });
        }
        Ok((var_kind(var_decl.kind), decls))
    }

    fn lower_function(&mut self, name: Option<String>, function: &ast::Function) -> Result<Function, Unsupported> {
        if function.is_generator {
            return Err(self.unsupported("GeneratorFunction", UnsupportedCategory::Expression, function));
        }
        if function.is_async {
            return Err(self.unsupported("AsyncFunction", UnsupportedCategory::Expression, function));
        }

        let mut params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            match &param.pat {
                ast::Pat::Ident(binding) => params.push(binding.id.sym.to_string()),
                pat => {
                    return Err(self.unsupported(pattern_kind(pat), UnsupportedCategory::Pattern, pat))
                }
            }
        }

        let body = function
            .body
            .as_ref()
            .map(|block| self.lower_stmts(&block.stmts))
            .unwrap_or_default();

        Ok(Function { name, params, body })
    }

    fn lower_args(&mut self, args: &[ast::ExprOrSpread]) -> Result<Vec<Expr>, Unsupported> {
        let mut lowered = Vec::with_capacity(args.len());
        for arg in args {
            if let Some(spread) = arg.spread {
                return Err(Unsupported::new(
                    "SpreadElement",
                    UnsupportedCategory::Expression,
                    self.spans.map(spread),
                ));
            }
            lowered.push(self.lower_expr(&arg.expr));
        }
        Ok(lowered)
    }

    fn lower_expr(&mut self, expr: &ast::Expr) -> Expr {
        match expr {
            ast::Expr::This(_) => Expr::This,
            ast::Expr::Ident(ident) => Expr::Ident(ident.sym.to_string()),
            ast::Expr::Lit(lit) => self.lower_lit(lit),
            ast::Expr::Paren(paren) => self.lower_expr(&paren.expr),
            ast::Expr::Array(array) => {
                let mut elems = Vec::with_capacity(array.elems.len());
                for elem in &array.elems {
                    match elem {
                        None => elems.push(None),
                        Some(e) if e.spread.is_some() => {
                            return Expr::Unsupported(self.unsupported(
                                "SpreadElement",
                                UnsupportedCategory::Expression,
                                array,
                            ))
                        }
                        Some(e) => elems.push(Some(self.lower_expr(&e.expr))),
                    }
                }
                Expr::Array(elems)
            }
            ast::Expr::Object(object) => self.lower_object(object),
            ast::Expr::Fn(fn_expr) => {
                let name = fn_expr.ident.as_ref().map(|i| i.sym.to_string());
                match self.lower_function(name, &fn_expr.function) {
                    Ok(func) => Expr::Function(Box::new(func)),
                    Err(unsupported) => Expr::Unsupported(unsupported),
                }
            }
            ast::Expr::Unary(unary) => {
                let op = match unary.op {
                    ast::UnaryOp::Minus => UnaryOp::Minus,
                    ast::UnaryOp::Plus => UnaryOp::Plus,
                    ast::UnaryOp::Bang => UnaryOp::Not,
                    ast::UnaryOp::Tilde => UnaryOp::BitNot,
                    ast::UnaryOp::TypeOf => UnaryOp::Typeof,
                    ast::UnaryOp::Void => UnaryOp::Void,
                    ast::UnaryOp::Delete => UnaryOp::Delete,
                };
                Expr::Unary {
                    op,
                    arg: Box::new(self.lower_expr(&unary.arg)),
                }
            }
            ast::Expr::Update(update) => {
                let arg = self.lower_expr(&update.arg);
                if !matches!(arg, Expr::Ident(_) | Expr::Member { .. }) {
                    return Expr::Unsupported(self.unsupported(
                        "UpdateExpression",
                        UnsupportedCategory::Expression,
                        update,
                    ));
                }
                Expr::Update {
                    op: match update.op {
                        ast::UpdateOp::PlusPlus => UpdateOp::Incr,
                        ast::UpdateOp::MinusMinus => UpdateOp::Decr,
                    },
                    prefix: update.prefix,
                    arg: Box::new(arg),
                }
            }
            ast::Expr::Bin(bin) => {
                let left = Box::new(self.lower_expr(&bin.left));
                let right = Box::new(self.lower_expr(&bin.right));
                match bin.op {
                    ast::BinaryOp::LogicalAnd => Expr::Logical {
                        op: LogicalOp::And,
                        left,
                        right,
                    },
                    ast::BinaryOp::LogicalOr => Expr::Logical {
                        op: LogicalOp::Or,
                        left,
                        right,
                    },
                    ast::BinaryOp::NullishCoalescing => Expr::Unsupported(self.unsupported(
                        "NullishCoalescing",
                        UnsupportedCategory::Expression,
                        bin,
                    )),
                    op => match binary_op(op) {
                        Some(op) => Expr::Binary { op, left, right },
                        None => Expr::Unsupported(self.unsupported(
                            "BinaryExpression",
                            UnsupportedCategory::Expression,
                            bin,
                        )),
                    },
                }
            }
            ast::Expr::Assign(assign) => self.lower_assign(assign),
            ast::Expr::Member(member) => self.lower_member(member),
            ast::Expr::Cond(cond) => Expr::Cond {
                test: Box::new(self.lower_expr(&cond.test)),
                cons: Box::new(self.lower_expr(&cond.cons)),
                alt: Box::new(self.lower_expr(&cond.alt)),
            },
            ast::Expr::Call(call) => self.lower_call(call),
            ast::Expr::New(new) => {
                let args = match &new.args {
                    Some(args) => match self.lower_args(args) {
                        Ok(args) => args,
                        Err(unsupported) => return Expr::Unsupported(unsupported),
                    },
                    None => Vec::new(),
                };
                Expr::New {
                    callee: Box::new(self.lower_expr(&new.callee)),
                    args,
                }
            }
            ast::Expr::Seq(seq) => Expr::Seq(seq.exprs.iter().map(|e| self.lower_expr(e)).collect()),
            other => Expr::Unsupported(self.unsupported(
                expr_kind(other),
                UnsupportedCategory::Expression,
                other,
            )),
        }
    }

    fn lower_lit(&mut self, lit: &ast::Lit) -> Expr {
        match lit {
            ast::Lit::Str(s) => Expr::Lit(str_lit(s)),
            ast::Lit::Bool(b) => Expr::Lit(Lit::Bool(b.value)),
            ast::Lit::Null(_) => Expr::Lit(Lit::Null),
            ast::Lit::Num(n) => Expr::Lit(Lit::Num(n.value)),
            ast::Lit::Regex(re) => Expr::Lit(Lit::Regex {
                pattern: re.exp.to_string(),
                flags: re.flags.to_string(),
            }),
            ast::Lit::BigInt(big) => Expr::Unsupported(self.unsupported(
                "BigIntLiteral",
                UnsupportedCategory::Expression,
                big,
            )),
            other => Expr::Unsupported(self.unsupported(
                "JSXText",
                UnsupportedCategory::Expression,
                other,
            )),
        }
    }

    fn lower_object(&mut self, object: &ast::ObjectLit) -> Expr {
        let mut props = Vec::with_capacity(object.props.len());
        for prop in &object.props {
            let prop = match prop {
                ast::PropOrSpread::Spread(spread) => {
                    let unsupported = Unsupported::new(
                        "SpreadElement",
                        UnsupportedCategory::Property,
                        self.spans.map(spread.dot3_token),
                    );
                    return Expr::Unsupported(unsupported);
                }
                ast::PropOrSpread::Prop(prop) => prop,
            };
            match prop.as_ref() {
                ast::Prop::KeyValue(kv) => {
                    let key = self.lower_prop_name(&kv.key);
                    props.push(Property {
                        key,
                        value: self.lower_expr(&kv.value),
                    });
                }
                ast::Prop::Shorthand(ident) => props.push(Property {
                    key: PropKey::Ident(ident.sym.to_string()),
                    value: Expr::Ident(ident.sym.to_string()),
                }),
                ast::Prop::Method(method) => {
                    let key = self.lower_prop_name(&method.key);
                    let value = match self.lower_function(None, &method.function) {
                        Ok(func) => Expr::Function(Box::new(func)),
                        Err(unsupported) => Expr::Unsupported(unsupported),
                    };
                    props.push(Property { key, value });
                }
                ast::Prop::Getter(getter) => props.push(Property {
                    key: self.lower_prop_name(&getter.key),
                    value: Expr::Unsupported(self.unsupported(
                        "GetterProperty",
                        UnsupportedCategory::Property,
                        getter,
                    )),
                }),
                ast::Prop::Setter(setter) => props.push(Property {
                    key: self.lower_prop_name(&setter.key),
                    value: Expr::Unsupported(self.unsupported(
                        "SetterProperty",
                        UnsupportedCategory::Property,
                        setter,
                    )),
                }),
                ast::Prop::Assign(assign) => props.push(Property {
                    key: PropKey::Ident(assign.key.sym.to_string()),
                    value: Expr::Unsupported(self.unsupported(
                        "AssignmentPattern",
                        UnsupportedCategory::Pattern,
                        assign,
                    )),
                }),
            }
        }
        Expr::Object(props)
    }

    fn lower_prop_name(&mut self, name: &ast::PropName) -> PropKey {
        match name {
            ast::PropName::Ident(ident) => PropKey::Ident(ident.sym.to_string()),
            ast::PropName::Str(s) => match str_lit(s) {
                Lit::Str(value) => PropKey::Str(value),
                other => PropKey::Computed(Box::new(Expr::Lit(other))),
            },
            ast::PropName::Num(n) => PropKey::Num(n.value),
            ast::PropName::Computed(computed) => PropKey::Computed(Box::new(self.lower_expr(&computed.expr))),
            ast::PropName::BigInt(big) => PropKey::Str(big.value.to_string()),
        }
    }

    fn lower_member(&mut self, member: &ast::MemberExpr) -> Expr {
        let prop = match &member.prop {
            ast::MemberProp::Ident(ident) => MemberProp::Ident(ident.sym.to_string()),
            ast::MemberProp::Computed(computed) => MemberProp::Computed(Box::new(self.lower_expr(&computed.expr))),
            ast::MemberProp::PrivateName(private) => {
                return Expr::Unsupported(self.unsupported(
                    "PrivateName",
                    UnsupportedCategory::Expression,
                    private,
                ))
            }
        };
        Expr::Member {
            object: Box::new(self.lower_expr(&member.obj)),
            prop,
        }
    }

    fn lower_assign(&mut self, assign: &ast::AssignExpr) -> Expr {
        let op = match assign_op(assign.op) {
            Some(op) => op,
            None => {
                return Expr::Unsupported(self.unsupported(
                    "LogicalAssignment",
                    UnsupportedCategory::Expression,
                    assign,
                ))
            }
        };

        let target = match &assign.left {
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::Ident(binding)) => {
                Expr::Ident(binding.id.sym.to_string())
            }
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::Member(member)) => self.lower_member(member),
            ast::AssignTarget::Simple(ast::SimpleAssignTarget::Paren(paren)) => self.lower_expr(&paren.expr),
            ast::AssignTarget::Simple(other) => {
                return Expr::Unsupported(self.unsupported(
                    "AssignmentExpression",
                    UnsupportedCategory::Expression,
                    other,
                ))
            }
            ast::AssignTarget::Pat(pat) => {
                let kind = match pat {
                    ast::AssignTargetPat::Array(_) => "ArrayPattern",
                    ast::AssignTargetPat::Object(_) => "ObjectPattern",
                    ast::AssignTargetPat::Invalid(_) => "InvalidPattern",
                };
                return Expr::Unsupported(self.unsupported(kind, UnsupportedCategory::Pattern, pat));
            }
        };

        if !matches!(target, Expr::Ident(_) | Expr::Member { .. }) {
            return Expr::Unsupported(self.unsupported(
                "AssignmentExpression",
                UnsupportedCategory::Expression,
                assign,
            ));
        }

        Expr::Assign {
            op,
            target: Box::new(target),
            value: Box::new(self.lower_expr(&assign.right)),
        }
    }

    fn lower_call(&mut self, call: &ast::CallExpr) -> Expr {
        let callee = match &call.callee {
            ast::Callee::Expr(callee) => callee,
            ast::Callee::Super(sup) => {
                return Expr::Unsupported(self.unsupported("Super", UnsupportedCategory::Expression, sup))
            }
            ast::Callee::Import(import) => {
                return Expr::Unsupported(self.unsupported(
                    "ImportExpression",
                    UnsupportedCategory::Expression,
                    import,
                ))
            }
        };

        let args = match self.lower_args(&call.args) {
            Ok(args) => args,
            Err(unsupported) => return Expr::Unsupported(unsupported),
        };
        let callee = self.lower_expr(callee);

        if matches!(&callee, Expr::Ident(name) if name == "eval") {
            self.diagnostics.push(
                Diagnostic::hint(DiagnosticCode::DynamicEval, "direct eval cannot see local variables")
                    .with_span(self.span(call))
                    .with_help("the evaluated code runs in the global scope of the Lua runtime")
                    .build(),
            );
        }

        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

/// String literal value; lone surrogates keep their WTF-8 encoding.
fn str_lit(s: &ast::Str) -> Lit {
    match s.value.as_str() {
        Some(value) => Lit::Str(value.to_string()),
        None => Lit::Wtf8(s.value.as_bytes().to_vec()),
    }
}

fn var_kind(kind: ast::VarDeclKind) -> VarKind {
    match kind {
        ast::VarDeclKind::Var => VarKind::Var,
        ast::VarDeclKind::Let => VarKind::Let,
        ast::VarDeclKind::Const => VarKind::Const,
    }
}

fn binary_op(op: ast::BinaryOp) -> Option<BinaryOp> {
    Some(match op {
        ast::BinaryOp::EqEq => BinaryOp::EqEq,
        ast::BinaryOp::NotEq => BinaryOp::NotEq,
        ast::BinaryOp::EqEqEq => BinaryOp::EqEqEq,
        ast::BinaryOp::NotEqEq => BinaryOp::NotEqEq,
        ast::BinaryOp::Lt => BinaryOp::Lt,
        ast::BinaryOp::LtEq => BinaryOp::LtEq,
        ast::BinaryOp::Gt => BinaryOp::Gt,
        ast::BinaryOp::GtEq => BinaryOp::GtEq,
        ast::BinaryOp::LShift => BinaryOp::Shl,
        ast::BinaryOp::RShift => BinaryOp::Shr,
        ast::BinaryOp::ZeroFillRShift => BinaryOp::UShr,
        ast::BinaryOp::Add => BinaryOp::Add,
        ast::BinaryOp::Sub => BinaryOp::Sub,
        ast::BinaryOp::Mul => BinaryOp::Mul,
        ast::BinaryOp::Div => BinaryOp::Div,
        ast::BinaryOp::Mod => BinaryOp::Mod,
        ast::BinaryOp::Exp => BinaryOp::Exp,
        ast::BinaryOp::BitOr => BinaryOp::BitOr,
        ast::BinaryOp::BitXor => BinaryOp::BitXor,
        ast::BinaryOp::BitAnd => BinaryOp::BitAnd,
        ast::BinaryOp::In => BinaryOp::In,
        ast::BinaryOp::InstanceOf => BinaryOp::InstanceOf,
        ast::BinaryOp::LogicalAnd | ast::BinaryOp::LogicalOr | ast::BinaryOp::NullishCoalescing => {
            return None
        }
    })
}

fn assign_op(op: ast::AssignOp) -> Option<AssignOp> {
    let compound = match op {
        ast::AssignOp::Assign => return Some(AssignOp::Assign),
        ast::AssignOp::AddAssign => BinaryOp::Add,
        ast::AssignOp::SubAssign => BinaryOp::Sub,
        ast::AssignOp::MulAssign => BinaryOp::Mul,
        ast::AssignOp::DivAssign => BinaryOp::Div,
        ast::AssignOp::ModAssign => BinaryOp::Mod,
        ast::AssignOp::LShiftAssign => BinaryOp::Shl,
        ast::AssignOp::RShiftAssign => BinaryOp::Shr,
        ast::AssignOp::ZeroFillRShiftAssign => BinaryOp::UShr,
        ast::AssignOp::BitOrAssign => BinaryOp::BitOr,
        ast::AssignOp::BitXorAssign => BinaryOp::BitXor,
        ast::AssignOp::BitAndAssign => BinaryOp::BitAnd,
        ast::AssignOp::ExpAssign => BinaryOp::Exp,
        ast::AssignOp::AndAssign | ast::AssignOp::OrAssign | ast::AssignOp::NullishAssign => {
            return None
        }
    };
    Some(AssignOp::Compound(compound))
}

fn pattern_kind(pat: &ast::Pat) -> &'static str {
    match pat {
        ast::Pat::Ident(_) => "Identifier",
        ast::Pat::Array(_) => "ArrayPattern",
        ast::Pat::Object(_) => "ObjectPattern",
        ast::Pat::Rest(_) => "RestElement",
        ast::Pat::Assign(_) => "AssignmentPattern",
        ast::Pat::Expr(_) => "ExpressionPattern",
        ast::Pat::Invalid(_) => "InvalidPattern",
    }
}

fn expr_kind(expr: &ast::Expr) -> &'static str {
    match expr {
        ast::Expr::Arrow(_) => "ArrowFunctionExpression",
        ast::Expr::Class(_) => "ClassExpression",
        ast::Expr::Tpl(_) => "TemplateLiteral",
        ast::Expr::TaggedTpl(_) => "TaggedTemplateExpression",
        ast::Expr::Yield(_) => "YieldExpression",
        ast::Expr::Await(_) => "AwaitExpression",
        ast::Expr::MetaProp(_) => "MetaProperty",
        ast::Expr::SuperProp(_) => "Super",
        ast::Expr::OptChain(_) => "ChainExpression",
        ast::Expr::PrivateName(_) => "PrivateName",
        _ => "UnknownExpression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(source: &str) -> Program {
        let script = jslua_parser::parse_script(source).unwrap();
        let mut diagnostics = Diagnostics::new();
        lower_script(&script, SpanMapper::dummy(), &mut diagnostics)
    }

    #[test]
    fn test_lower_var_and_function() {
        let program = lower("var a = 1, b; function f(x, y) { return x + y; }");
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Stmt::VarDecl { kind, decls } => {
                assert_eq!(*kind, VarKind::Var);
                assert_eq!(decls[0].name, "a");
                assert_eq!(decls[0].init, Some(Expr::num(1.0)));
                assert_eq!(decls[1].init, None);
            }
            other => panic!("expected var decl, got {:?}", other),
        }
        match &program.body[1] {
            Stmt::FnDecl(func) => {
                assert_eq!(func.name.as_deref(), Some("f"));
                assert_eq!(func.params, vec!["x".to_string(), "y".to_string()]);
                assert!(matches!(func.body[0], Stmt::Return(Some(Expr::Binary { op: BinaryOp::Add, .. }))));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_and_compound_assign() {
        let program = lower("a && b; x += 2;");
        assert!(matches!(
            program.body[0],
            Stmt::Expr(Expr::Logical { op: LogicalOp::And, .. })
        ));
        assert!(matches!(
            program.body[1],
            Stmt::Expr(Expr::Assign { op: AssignOp::Compound(BinaryOp::Add), .. })
        ));
    }

    #[test]
    fn test_parens_are_transparent() {
        let program = lower("(f)(1);");
        match &program.body[0] {
            Stmt::Expr(Expr::Call { callee, args }) => {
                assert_eq!(**callee, Expr::ident("f"));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_constructs_are_tagged() {
        let program = lower("var f = x => x; for (const v of xs) {} var {a} = o;");
        match &program.body[0] {
            Stmt::VarDecl { decls, .. } => match &decls[0].init {
                Some(Expr::Unsupported(u)) => {
                    assert_eq!(u.kind, "ArrowFunctionExpression");
                    assert_eq!(u.category, UnsupportedCategory::Expression);
                }
                other => panic!("expected unsupported init, got {:?}", other),
            },
            other => panic!("expected var decl, got {:?}", other),
        }
        assert_eq!(program.body[1].kind_name(), "ForOfStatement");
        match &program.body[2] {
            Stmt::Unsupported(u) => {
                assert_eq!(u.kind, "ObjectPattern");
                assert_eq!(u.category, UnsupportedCategory::Pattern);
            }
            other => panic!("expected unsupported pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_try_and_labels() {
        let program = lower("outer: for (;;) { try { break outer; } catch (e) { continue outer; } finally { g(); } }");
        let Stmt::Labeled { label, body } = &program.body[0] else {
            panic!("expected labeled statement");
        };
        assert_eq!(label, "outer");
        let Stmt::For { init: None, test: None, update: None, body } = body.as_ref() else {
            panic!("expected bare for loop");
        };
        let Stmt::Block(stmts) = body.as_ref() else {
            panic!("expected block");
        };
        match &stmts[0] {
            Stmt::Try { block, handlers, finalizer, .. } => {
                assert!(matches!(&block[0], Stmt::Break { label: Some(l), .. } if l == "outer"));
                assert_eq!(handlers.len(), 1);
                assert_eq!(handlers[0].param.as_deref(), Some("e"));
                assert!(finalizer.is_some());
            }
            other => panic!("expected try, got {:?}", other),
        }
    }

    #[test]
    fn test_for_in_heads() {
        let program = lower("for (var k in o) {} for (p.q in o) {}");
        assert!(matches!(
            &program.body[0],
            Stmt::ForIn { left: ForInLeft::VarDecl { name, .. }, .. } if name == "k"
        ));
        assert!(matches!(
            &program.body[1],
            Stmt::ForIn { left: ForInLeft::Target(Expr::Member { .. }), .. }
        ));
    }

    #[test]
    fn test_literals() {
        let program = lower(r#"f(null, true, 1.5, "s", /a+b/gi);"#);
        let Stmt::Expr(Expr::Call { args, .. }) = &program.body[0] else {
            panic!("expected call");
        };
        assert_eq!(args[0], Expr::Lit(Lit::Null));
        assert_eq!(args[1], Expr::Lit(Lit::Bool(true)));
        assert_eq!(args[2], Expr::num(1.5));
        assert_eq!(args[3], Expr::string("s"));
        assert_eq!(
            args[4],
            Expr::Lit(Lit::Regex {
                pattern: "a+b".to_string(),
                flags: "gi".to_string()
            })
        );
    }

    #[test]
    fn test_lone_surrogate_strings_keep_their_bytes() {
        let program = lower(r#"f('a\uD800b', { 'k\uDC00': 1 });"#);
        let Stmt::Expr(Expr::Call { args, .. }) = &program.body[0] else {
            panic!("expected call");
        };
        assert_eq!(args[0], Expr::Lit(Lit::Wtf8(vec![b'a', 0xED, 0xA0, 0x80, b'b'])));
        let Expr::Object(props) = &args[1] else {
            panic!("expected object");
        };
        assert_eq!(
            props[0].key,
            PropKey::Computed(Box::new(Expr::Lit(Lit::Wtf8(vec![b'k', 0xED, 0xB0, 0x80]))))
        );
    }

    #[test]
    fn test_direct_eval_hint() {
        let script = jslua_parser::parse_script("eval('1');").unwrap();
        let mut diagnostics = Diagnostics::new();
        lower_script(&script, SpanMapper::dummy(), &mut diagnostics);
        assert!(diagnostics.contains(DiagnosticCode::DynamicEval));
    }

    #[test]
    fn test_switch() {
        let program = lower("switch (x) { case 1: a(); break; default: b(); }");
        let Stmt::Switch { cases, .. } = &program.body[0] else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 2);
        assert!(cases[0].test.is_some());
        assert!(cases[1].test.is_none());
        assert_eq!(cases[0].body.len(), 2);
    }
}
