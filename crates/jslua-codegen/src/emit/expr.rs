//! Expression lowering.
//!
//! Every expression becomes one Lua expression string. Constructs with side
//! effects in value position (assignments, updates) are wrapped in an
//! immediately invoked closure.

use jslua_hir::{
    function_references, AssignOp, BinaryOp, Expr, Function, Lit, LogicalOp, MemberProp, PropKey,
    Property, UnaryOp, UpdateOp,
};

use super::Emitter;
use crate::names::{escape_ident, lua_bytes, lua_number, lua_string, member_access, number_key};
use crate::runtime;
use crate::scope::{NameRole, Resolution};

/// Where an expression appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ExprCtx {
    /// The value is discarded
    pub statement: bool,
    /// Read rather than assigned to
    pub rvalue: bool,
    /// Identifier reads may be wrapped in the reference guard
    pub guard: bool,
}

impl ExprCtx {
    pub const VALUE: ExprCtx = ExprCtx {
        statement: false,
        rvalue: true,
        guard: true,
    };
    pub const STATEMENT: ExprCtx = ExprCtx {
        statement: true,
        rvalue: true,
        guard: true,
    };
    pub const TARGET: ExprCtx = ExprCtx {
        statement: false,
        rvalue: false,
        guard: false,
    };
    pub const UNGUARDED: ExprCtx = ExprCtx {
        statement: false,
        rvalue: true,
        guard: false,
    };
}

impl<'a> Emitter<'a> {
    pub(super) fn expr(&mut self, expr: &Expr) -> String {
        self.expr_with(expr, ExprCtx::VALUE)
    }

    pub(super) fn expr_with(&mut self, expr: &Expr, ctx: ExprCtx) -> String {
        match expr {
            Expr::Ident(name) => self.ident(name, ctx),
            Expr::This => "self".to_string(),
            Expr::Lit(lit) => literal(lit),
            Expr::Array(items) => self.array(items),
            Expr::Object(props) => self.object(props),
            Expr::Function(func) => self.function_value(func),
            Expr::Unary { op, arg } => self.unary(*op, arg),
            Expr::Update { op, prefix, arg } => self.update(*op, *prefix, arg, ctx),
            Expr::Binary { op, left, right } => {
                let left = self.expr(left);
                let right = self.expr(right);
                binary(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.expr(left);
                let right = self.expr(right);
                let op = match op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                };
                format!("({} {} {})", left, op, right)
            }
            Expr::Assign { op, target, value } => self.assign(*op, target, value, ctx),
            Expr::Cond { test, cons, alt } => {
                let test = self.expr(test);
                let cons = self.expr(cons);
                let alt = self.expr(alt);
                format!(
                    "(({}({}) and {save}({}) or {save}({})) and {}())",
                    runtime::TO_BOOLEAN,
                    test,
                    cons,
                    alt,
                    runtime::TERNARY_RESTORE,
                    save = runtime::TERNARY_SAVE,
                )
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::New { callee, args } => {
                let mut parts = vec![self.expr(callee)];
                parts.extend(self.exprs(args));
                format!("{}({})", runtime::NEW, parts.join(", "))
            }
            Expr::Member { object, prop } => self.member(object, prop, ctx),
            Expr::Seq(items) => {
                let values = self.exprs(items);
                format!("({{{}}})[{}]", values.join(", "), values.len())
            }
            Expr::Unsupported(node) => {
                self.unsupported(node);
                format!("(nil --[[{}]])", node.kind)
            }
        }
    }

    fn exprs(&mut self, items: &[Expr]) -> Vec<String> {
        items.iter().map(|item| self.expr(item)).collect()
    }

    fn ident(&mut self, name: &str, ctx: ExprCtx) -> String {
        let resolution = self.scope.resolve(name);
        if let Resolution::Dynamic { .. } = resolution {
            self.note_dynamic(name);
        }
        let spelled = escape_ident(name);

        let exempt = runtime::is_guard_exempt(name)
            || matches!(
                resolution,
                Resolution::Local(NameRole::Parameter | NameRole::Function | NameRole::Builtin)
            );
        if self.options.ref_guard && ctx.rvalue && ctx.guard && !exempt {
            format!("{}({})", runtime::REF_CHECK, spelled)
        } else {
            spelled
        }
    }

    fn array(&mut self, items: &[Option<Expr>]) -> String {
        let mut fields = Vec::with_capacity(items.len() + 1);
        for (index, item) in items.iter().enumerate() {
            let value = match item {
                Some(item) => self.expr(item),
                None => "nil".to_string(),
            };
            fields.push(format!("[{}]={}", index, value));
        }
        fields.push(format!("[\"__Length\"]={}", items.len()));
        format!("{}({{{}}})", runtime::MAKE_ARRAY, fields.join(", "))
    }

    fn object(&mut self, props: &[Property]) -> String {
        let mut fields = Vec::with_capacity(props.len());
        for prop in props {
            let key = match &prop.key {
                PropKey::Ident(name) | PropKey::Str(name) => lua_string(name),
                PropKey::Num(value) => lua_string(&number_key(*value)),
                PropKey::Computed(key) => self.expr(key),
            };
            let value = self.expr(&prop.value);
            fields.push(format!("[{}]={}", key, value));
        }
        format!("{}({{{}}})", runtime::MAKE_OBJECT, fields.join(", "))
    }

    /// A function expression. A named one that refers to itself gets a
    /// local binding for its name first.
    fn function_value(&mut self, func: &Function) -> String {
        let name = match func.name.as_deref() {
            Some(name) if function_references(func).contains(name) => name,
            _ => return self.function_literal(func),
        };

        let saved_out = std::mem::take(&mut self.out);
        let outer_indent = self.indent;
        self.indent += 1;
        self.scope.push_lexical(
            Vec::<String>::new(),
            [name],
            Vec::<String>::new(),
            "named-function",
        );
        self.scope.mark_declared(name);

        let spelled = escape_ident(name);
        self.line(format!("local {}", spelled));
        let literal = self.function_literal(func);
        self.line(format!("{} = {}", spelled, literal));
        self.line(format!("return {}", spelled));

        self.scope.pop_scope();
        self.indent = outer_indent;
        let body = std::mem::replace(&mut self.out, saved_out);
        format!("(function ()\n{}{}end)()", body, self.indent_str())
    }

    fn unary(&mut self, op: UnaryOp, arg: &Expr) -> String {
        match op {
            UnaryOp::Typeof => {
                let value = self.expr_with(arg, ExprCtx::UNGUARDED);
                format!("{}({})", runtime::TYPEOF, value)
            }
            UnaryOp::BitNot => format!("{}({})", runtime::BIT_NOT, self.expr(arg)),
            UnaryOp::Delete => self.delete(arg),
            UnaryOp::Void => "nil".to_string(),
            UnaryOp::Not => format!("(not {}({}))", runtime::TO_BOOLEAN, self.expr(arg)),
            UnaryOp::Plus => format!("({}({}))", runtime::TO_NUMBER, self.expr(arg)),
            UnaryOp::Minus => format!("(-{}({}))", runtime::TO_NUMBER, self.expr(arg)),
        }
    }

    fn delete(&mut self, arg: &Expr) -> String {
        match arg {
            Expr::Member { object, prop } => {
                let object = self.expr(object);
                let key = match prop {
                    MemberProp::Ident(name) => lua_string(name),
                    MemberProp::Computed(key) => self.expr(key),
                };
                format!("{}({}, {})", runtime::DELETE, object, key)
            }
            Expr::Ident(name) => format!("{}(self, {})", runtime::DELETE, lua_string(name)),
            Expr::This => "(true)".to_string(),
            _ => "(false)".to_string(),
        }
    }

    fn update(&mut self, op: UpdateOp, prefix: bool, arg: &Expr, ctx: ExprCtx) -> String {
        let target = self.expr_with(arg, ExprCtx::TARGET);
        let current = self.expr(arg);
        let step = match op {
            UpdateOp::Incr => format!("{}({}, 1)", runtime::PLUS_OP, current),
            UpdateOp::Decr => format!("({} - 1)", current),
        };

        if ctx.statement {
            format!("{} = {}", target, step)
        } else if prefix {
            format!("((function () {} = {}; return {} end)())", target, step, current)
        } else {
            let old = self.ids.fresh("__tmp");
            format!(
                "((function () local {old} = {}; {} = {}; return {old} end)())",
                current,
                target,
                step,
                old = old
            )
        }
    }

    fn assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, ctx: ExprCtx) -> String {
        let lhs = self.expr_with(target, ExprCtx::TARGET);
        let rhs = match op {
            AssignOp::Assign => self.expr(value),
            AssignOp::Compound(op) => {
                let current = self.expr(target);
                let value = self.expr(value);
                binary(op, &current, &value)
            }
        };

        if ctx.statement {
            format!("{} = {}", lhs, rhs)
        } else {
            let read = self.expr(target);
            format!("((function () {} = {}; return {} end)())", lhs, rhs, read)
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr]) -> String {
        match callee {
            Expr::Member { object, prop } => {
                let mut parts = vec![self.expr(object)];
                parts.push(match prop {
                    MemberProp::Ident(name) => lua_string(name),
                    MemberProp::Computed(key) => self.index_key(object, key),
                });
                parts.extend(self.exprs(args));
                format!("{}({})", runtime::CALL_MEMBER, parts.join(", "))
            }
            Expr::Lit(_) => {
                let args = self.exprs(args);
                format!("{}({})", runtime::LITERAL_CALL_FAIL, args.join(", "))
            }
            Expr::Function(_) => {
                let function = self.expr(callee);
                let args = self.exprs(args);
                format!("({})({})", function, args.join(", "))
            }
            _ => {
                let function = as_prefix(self.expr(callee));
                let args = self.exprs(args);
                format!("{}({})", function, args.join(", "))
            }
        }
    }

    fn member(&mut self, object: &Expr, prop: &MemberProp, ctx: ExprCtx) -> String {
        if let MemberProp::Ident(name) = prop {
            if ctx.rvalue && name == "length" {
                let object = self.expr(object);
                return format!("{}({})", runtime::LENGTH, object);
            }
        }

        let base = match object {
            Expr::Lit(_) => format!("({})", self.expr(object)),
            _ => as_prefix(self.expr(object)),
        };
        match prop {
            MemberProp::Ident(name) => format!("{}{}", base, member_access(name)),
            MemberProp::Computed(key) => {
                let key = self.index_key(object, key);
                format!("{}[{}]", base, key)
            }
        }
    }

    /// The `arguments` object is a packed Lua table and starts at 1.
    fn index_key(&mut self, object: &Expr, key: &Expr) -> String {
        let key = self.expr(key);
        match object {
            Expr::Ident(name) if name == "arguments" => format!("{} + 1", key),
            _ => key,
        }
    }
}

fn literal(lit: &Lit) -> String {
    match lit {
        Lit::Null => runtime::NULL.to_string(),
        Lit::Bool(value) => value.to_string(),
        Lit::Num(value) => lua_number(*value),
        Lit::Str(value) => lua_string(value),
        Lit::Wtf8(bytes) => lua_bytes(bytes),
        Lit::Regex { pattern, flags } => format!(
            "{}({}, {})",
            runtime::NEW,
            runtime::REGEXP,
            lua_string(&format!("/{}/{}", pattern, flags))
        ),
    }
}

fn binary(op: BinaryOp, left: &str, right: &str) -> String {
    if let Some(helper) = runtime::binary_helper(op) {
        let call = format!("{}({}, {})", helper, left, right);
        return match op {
            BinaryOp::NotEqEq => format!("(not {})", call),
            _ => call,
        };
    }
    let op = match op {
        BinaryOp::NotEq => "~=",
        BinaryOp::Exp => "^",
        other => other.as_str(),
    };
    format!("({} {} {})", left, op, right)
}

/// Parenthesize text that Lua does not accept before `(`, `.` or `[`.
fn as_prefix(text: String) -> String {
    let bare_value = matches!(text.as_str(), "nil" | "true" | "false");
    let literal_start = text.starts_with(|c: char| c.is_ascii_digit() || c == '"' || c == '{');
    if bare_value || literal_start {
        format!("({})", text)
    } else {
        text
    }
}
