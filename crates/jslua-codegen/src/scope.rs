//! Scope stack used while emitting.
//!
//! Lexical frames hold the names a function body (or the program root) binds;
//! object-backed frames stand for the injected scope of a `with` statement,
//! proxied through one synthesized local. The bottom frame is the global
//! object, so a name that no lexical frame binds resolves to a global.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    Var,
    Function,
    Parameter,
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Lexical,
    ObjectBacked { proxy: String },
}

#[derive(Debug, Clone)]
pub struct ScopeFrame {
    pub kind: FrameKind,
    bindings: HashMap<String, NameRole>,
    /// Names already emitted as Lua `local`s in this frame
    declared: HashSet<String>,
    /// For logs and diagnostics only
    pub label: String,
}

/// Where a bare name is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local(NameRole),
    /// A `with` object may or may not own the name
    Dynamic { proxy: String },
    Global,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a lexical frame. A name listed under several roles keeps the last
    /// one, in the order vars, funcs, params.
    pub fn push_lexical<V, F, P>(&mut self, vars: V, funcs: F, params: P, label: &str)
    where
        V: IntoIterator,
        V::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        let mut bindings = HashMap::new();
        for name in vars {
            bindings.insert(name.into(), NameRole::Var);
        }
        for name in funcs {
            bindings.insert(name.into(), NameRole::Function);
        }
        for name in params {
            bindings.insert(name.into(), NameRole::Parameter);
        }
        log::trace!("push lexical scope {} ({} names)", label, bindings.len());
        self.frames.push(ScopeFrame {
            kind: FrameKind::Lexical,
            bindings,
            declared: HashSet::new(),
            label: label.to_string(),
        });
    }

    /// Push an object-backed frame whose names live in the table `proxy`.
    pub fn push_object_ident(&mut self, proxy: &str, label: &str) {
        log::trace!("push object scope {} via {}", label, proxy);
        self.frames.push(ScopeFrame {
            kind: FrameKind::ObjectBacked {
                proxy: proxy.to_string(),
            },
            bindings: HashMap::new(),
            declared: HashSet::new(),
            label: label.to_string(),
        });
    }

    /// Pop the innermost frame.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty: every pop must pair with a push.
    pub fn pop_scope(&mut self) -> ScopeFrame {
        match self.frames.pop() {
            Some(frame) => {
                log::trace!("pop scope {}", frame.label);
                frame
            }
            None => panic!("pop_scope on an empty scope stack"),
        }
    }

    /// Bind `name` in the innermost frame, replacing any earlier role.
    pub fn define(&mut self, name: &str, role: NameRole) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.to_string(), role);
        }
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        for (index, frame) in self.frames.iter().enumerate().rev() {
            match &frame.kind {
                FrameKind::Lexical => {
                    if let Some(role) = frame.bindings.get(name) {
                        return Resolution::Local(*role);
                    }
                }
                FrameKind::ObjectBacked { .. } if index == 0 => return Resolution::Global,
                FrameKind::ObjectBacked { proxy } => {
                    return Resolution::Dynamic {
                        proxy: proxy.clone(),
                    }
                }
            }
        }
        Resolution::Global
    }

    /// Record that `name` has been emitted as a `local` in the nearest
    /// lexical frame. Returns false if it already was.
    pub fn mark_declared(&mut self, name: &str) -> bool {
        match self
            .frames
            .iter_mut()
            .rev()
            .find(|f| f.kind == FrameKind::Lexical)
        {
            Some(frame) => frame.declared.insert(name.to_string()),
            None => false,
        }
    }
}
