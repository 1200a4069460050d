//! Runtime-independent statements that components emit.
//!
//! A component describes what the generated script does once; each
//! [`Printer`](crate::Printer) decides how that reads in its runtime. Both
//! runtimes therefore record exactly the same data for the same parameters.

use cogex_cache::{Atom, intern_ident};
use cogex_core::ComponentStatus;

/// Classes provided by the runtime libraries.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeClass {
    Mouse,
}

#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum BinOp {
    And,
    Eq,
    Ge,
    Add,
}

impl BinOp {
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BinOp::And => 1,
            BinOp::Eq | BinOp::Ge => 2,
            BinOp::Add => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Script or host name: components, clocks, `t`, `frameN`, block locals.
    Name(Atom),
    /// Routine-persistent variable that must survive between frames.
    State(Atom),
    Attr(Box<Expr>, Atom),
    Index(Box<Expr>, usize),
    Call {
        recv: Box<Expr>,
        method: Atom,
        args: Vec<Expr>,
    },
    /// Runtime object bound to the experiment window.
    Construct(RuntimeClass),
    List(Vec<Expr>),
    Int(i64),
    Bool(bool),
    Null,
    Status(ComponentStatus),
    /// Code written by the experimenter, inserted as-is.
    Code(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Two button vectors differ in any channel.
    Changed(Box<Expr>, Box<Expr>),
    /// At least one channel of a button vector is down.
    AnyPressed(Box<Expr>),
    /// The sequence holds at least one value.
    NonEmpty(Box<Expr>),
}

impl Expr {
    pub fn name(s: &str) -> Expr {
        Expr::Name(intern_ident(s))
    }

    pub fn state(s: &str) -> Expr {
        Expr::State(intern_ident(s))
    }

    /// Experimenter code; a leading `$` only marks the field as code.
    pub fn code(s: &str) -> Expr {
        let s = s.trim();
        Expr::Code(s.strip_prefix('$').unwrap_or(s).trim().to_string())
    }

    pub fn attr(self, attr: &Atom) -> Expr {
        Expr::Attr(Box::new(self), attr.clone())
    }

    pub fn field(self, attr: &str) -> Expr {
        Expr::Attr(Box::new(self), intern_ident(attr))
    }

    pub fn index(self, i: usize) -> Expr {
        Expr::Index(Box::new(self), i)
    }

    pub fn call(self, method: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            recv: Box::new(self),
            method: intern_ident(method),
            args,
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn and(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::And, self, rhs)
    }

    pub fn eq(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Eq, self, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Ge, self, rhs)
    }

    pub fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinOp::Add, self, rhs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Comment(String),
    Assign {
        target: Expr,
        value: Expr,
    },
    /// Binds each name to the matching element of a sequence value.
    Unpack {
        names: Vec<Atom>,
        value: Expr,
    },
    /// Script-level placeholders for locals that later phases assign.
    DeclareLocals(Vec<Atom>),
    Append {
        list: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        body: Vec<Stmt>,
    },
    ForEach {
        var: Atom,
        items: Vec<Expr>,
        body: Vec<Stmt>,
    },
    /// One-shot request for the host's frame loop to finish the routine.
    EndRoutine,
    AddData {
        handler: Atom,
        key: String,
        value: Expr,
    },
    NextEntry {
        handler: Atom,
    },
    /// Statements whose locals stay private to one component.
    Scope(Vec<Stmt>),
}

impl Stmt {
    pub fn comment(text: impl Into<String>) -> Stmt {
        Stmt::Comment(text.into())
    }

    pub fn assign(target: Expr, value: Expr) -> Stmt {
        Stmt::Assign { target, value }
    }

    pub fn append(list: Expr, value: Expr) -> Stmt {
        Stmt::Append { list, value }
    }

    pub fn when(cond: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::If { cond, body }
    }

    fn children(&self) -> &[Stmt] {
        match self {
            Stmt::If { body, .. } | Stmt::ForEach { body, .. } | Stmt::Scope(body) => body,
            _ => &[],
        }
    }
}

/// Depth-first walk over a statement tree.
pub fn walk<'a>(stmts: &'a [Stmt], visit: &mut impl FnMut(&'a Stmt)) {
    for stmt in stmts {
        visit(stmt);
        walk(stmt.children(), visit);
    }
}

/// Keys of every data record in the tree, in emission order.
pub fn recorded_keys(stmts: &[Stmt]) -> Vec<&str> {
    let mut keys = Vec::new();
    walk(stmts, &mut |stmt| {
        if let Stmt::AddData { key, .. } = stmt {
            keys.push(key.as_str());
        }
    });
    keys
}

/// Deepest block nesting in the tree; top-level statements have depth 0.
/// Scopes add no nesting of their own.
pub fn max_depth(stmts: &[Stmt]) -> usize {
    stmts
        .iter()
        .map(|s| match s {
            Stmt::If { body, .. } | Stmt::ForEach { body, .. } => 1 + max_depth(body),
            Stmt::Scope(body) => max_depth(body),
            _ => 0,
        })
        .max()
        .unwrap_or(0)
}
