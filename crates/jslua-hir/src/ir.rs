//! Node definitions for the translator's JavaScript tree.
//!
//! This is a closed, ES5-shaped subset of the language: every construct the
//! Lua emitter knows how to lower has a variant here, and everything else is
//! carried as [`Unsupported`] so translation can continue past it.

use jslua_diagnostics::Span;

/// A whole script.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// What kind of construct an [`Unsupported`] node stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedCategory {
    Statement,
    Expression,
    /// Destructuring patterns, default values, rest elements
    Pattern,
    /// Getters, setters and spread members of object literals
    Property,
}

/// Placeholder for a construct outside the supported subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Unsupported {
    /// ESTree node name, e.g. `ArrowFunctionExpression`
    pub kind: &'static str,
    pub category: UnsupportedCategory,
    pub span: Span,
}

impl Unsupported {
    pub fn new(kind: &'static str, category: UnsupportedCategory, span: Span) -> Self {
        Self { kind, category, span }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    pub init: Option<Expr>,
}

/// A function declaration or function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Declared name; optional for expressions
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// `None` for an optional catch binding (`catch { ... }`)
    pub param: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// Initializer clause of a counted `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    Expr(Expr),
}

/// Left-hand side of `for (left in right)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    /// `for (var k in o)`
    VarDecl { kind: VarKind, name: String },
    /// `for (k in o)` or `for (o.k in p)`
    Target(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty,
    Expr(Expr),
    VarDecl {
        kind: VarKind,
        decls: Vec<VarDeclarator>,
    },
    /// Function declaration; `name` is always set
    FnDecl(Function),
    Return(Option<Expr>),
    Throw(Expr),
    Break {
        label: Option<String>,
        span: Span,
    },
    Continue {
        label: Option<String>,
        span: Span,
    },
    If {
        test: Expr,
        cons: Box<Stmt>,
        alt: Option<Box<Stmt>>,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        left: ForInLeft,
        right: Expr,
        body: Box<Stmt>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Try {
        block: Vec<Stmt>,
        /// More than one entry is representable but only one is lowered
        handlers: Vec<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
        span: Span,
    },
    With {
        object: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Unsupported(Unsupported),
}

impl Stmt {
    /// Loops are the only statements a bare `continue` can target.
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            Stmt::While { .. } | Stmt::DoWhile { .. } | Stmt::For { .. } | Stmt::ForIn { .. }
        )
    }

    /// ESTree name of the statement kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Empty => "EmptyStatement",
            Stmt::Expr(_) => "ExpressionStatement",
            Stmt::VarDecl { .. } => "VariableDeclaration",
            Stmt::FnDecl(_) => "FunctionDeclaration",
            Stmt::Return(_) => "ReturnStatement",
            Stmt::Throw(_) => "ThrowStatement",
            Stmt::Break { .. } => "BreakStatement",
            Stmt::Continue { .. } => "ContinueStatement",
            Stmt::If { .. } => "IfStatement",
            Stmt::While { .. } => "WhileStatement",
            Stmt::DoWhile { .. } => "DoWhileStatement",
            Stmt::For { .. } => "ForStatement",
            Stmt::ForIn { .. } => "ForInStatement",
            Stmt::Switch { .. } => "SwitchStatement",
            Stmt::Try { .. } => "TryStatement",
            Stmt::With { .. } => "WithStatement",
            Stmt::Labeled { .. } => "LabeledStatement",
            Stmt::Block(_) => "BlockStatement",
            Stmt::Unsupported(u) => u.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    /// String holding a lone surrogate, kept as its WTF-8 bytes
    Wtf8(Vec<u8>),
    /// Pattern source and flags, without the slashes
    Regex { pattern: String, flags: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Incr,
    Decr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    InstanceOf,
}

impl BinaryOp {
    /// JavaScript spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::EqEqEq => "===",
            BinaryOp::NotEqEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// `=` or a compound operator such as `+=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(f64),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropKey,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `o.name`
    Ident(String),
    /// `o[expr]`
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    This,
    Lit(Lit),
    /// `None` entries are holes (`[1, , 3]`)
    Array(Vec<Option<Expr>>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Unary {
        op: UnaryOp,
        arg: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        arg: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `target` is an `Ident` or `Member`
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Cond {
        test: Box<Expr>,
        cons: Box<Expr>,
        alt: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        prop: MemberProp,
    },
    Seq(Vec<Expr>),
    Unsupported(Unsupported),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn num(value: f64) -> Expr {
        Expr::Lit(Lit::Num(value))
    }

    pub fn string(value: impl Into<String>) -> Expr {
        Expr::Lit(Lit::Str(value.into()))
    }

    pub fn assign(target: Expr, value: Expr) -> Expr {
        Expr::Assign {
            op: AssignOp::Assign,
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn member(object: Expr, name: impl Into<String>) -> Expr {
        Expr::Member {
            object: Box::new(object),
            prop: MemberProp::Ident(name.into()),
        }
    }

    /// Expressions that already have an effect when used as a statement:
    /// assignments, calls, updates and sequences. Everything else is sunk.
    pub fn is_statement_like(&self) -> bool {
        matches!(
            self,
            Expr::Assign { .. } | Expr::Call { .. } | Expr::Update { .. } | Expr::Seq(_)
        )
    }

    /// ESTree name of the expression kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Ident(_) => "Identifier",
            Expr::This => "ThisExpression",
            Expr::Lit(_) => "Literal",
            Expr::Array(_) => "ArrayExpression",
            Expr::Object(_) => "ObjectExpression",
            Expr::Function(_) => "FunctionExpression",
            Expr::Unary { .. } => "UnaryExpression",
            Expr::Update { .. } => "UpdateExpression",
            Expr::Binary { .. } => "BinaryExpression",
            Expr::Logical { .. } => "LogicalExpression",
            Expr::Assign { .. } => "AssignmentExpression",
            Expr::Cond { .. } => "ConditionalExpression",
            Expr::Call { .. } => "CallExpression",
            Expr::New { .. } => "NewExpression",
            Expr::Member { .. } => "MemberExpression",
            Expr::Seq(_) => "SequenceExpression",
            Expr::Unsupported(u) => u.kind,
        }
    }
}
