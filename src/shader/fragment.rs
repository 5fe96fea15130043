//! Typed Program Fragments
//!
//! Generators describe a program as a sequence of [`Fragment`]s around an
//! [`EntryPoint`]. The `Display` impls in this file are the only place that
//! knows Artic's surface syntax (`#[export]`, `let x = v : T;`, call lists),
//! so a syntax change touches this layer alone.

use std::fmt;

use smallvec::SmallVec;

/// Body indentation used for every line the generators produce themselves.
const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub ty: &'static str,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// Exported function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: &'static str,
    pub params: SmallVec<[Param; 8]>,
    pub returns: &'static str,
}

impl EntryPoint {
    #[must_use]
    pub fn new(name: &'static str, params: &[(&'static str, &'static str)], returns: &'static str) -> Self {
        Self {
            name,
            params: params.iter().map(|&(name, ty)| Param { name, ty }).collect(),
            returns,
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[export] fn {}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {} {{", self.returns)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Ident(&'static str),
    Call(Call),
}

impl Expr {
    #[inline]
    #[must_use]
    pub fn ident(name: &'static str) -> Self {
        Self::Ident(name)
    }
}

impl From<Call> for Expr {
    fn from(call: Call) -> Self {
        Self::Call(call)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Ident(name) => f.write_str(name),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

/// A free function call, or a method call on a bound name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub receiver: Option<&'static str>,
    pub function: &'static str,
    pub args: Vec<Expr>,
}

impl Call {
    #[must_use]
    pub fn free(function: &'static str, args: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            receiver: None,
            function,
            args: args.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn method(receiver: &'static str, function: &'static str, args: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            receiver: Some(receiver),
            function,
            args: args.into_iter().collect(),
        }
    }

    /// Call whose arguments are all plain identifiers.
    #[must_use]
    pub fn forward(receiver: &'static str, function: &'static str, names: &[&'static str]) -> Self {
        Self::method(receiver, function, names.iter().copied().map(Expr::Ident))
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(receiver) = self.receiver {
            write!(f, "{receiver}.")?;
        }
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// One line (or block) of a program body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Collaborator output. Already indented, written as-is.
    Source(String),
    /// A single generator-owned line given as raw text.
    Inline(String),
    /// `call;`
    Statement(Call),
    /// `let name = value;` or `let name = value : ty;`
    Let {
        name: &'static str,
        value: Expr,
        ty: Option<&'static str>,
    },
    Blank,
}

impl Fragment {
    #[must_use]
    pub fn binding(name: &'static str, value: impl Into<Expr>) -> Self {
        Self::Let {
            name,
            value: value.into(),
            ty: None,
        }
    }

    #[must_use]
    pub fn typed_binding(name: &'static str, value: impl Into<Expr>, ty: &'static str) -> Self {
        Self::Let {
            name,
            value: value.into(),
            ty: Some(ty),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(text) => writeln!(f, "{text}"),
            Self::Inline(text) => writeln!(f, "{INDENT}{text}"),
            Self::Statement(call) => writeln!(f, "{INDENT}{call};"),
            Self::Let { name, value, ty: Some(ty) } => writeln!(f, "{INDENT}let {name} = {value} : {ty};"),
            Self::Let { name, value, ty: None } => writeln!(f, "{INDENT}let {name} = {value};"),
            Self::Blank => writeln!(f),
        }
    }
}

/// A complete generated program: preamble, one exported entry point, and the
/// tail expression it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub preamble: String,
    pub entry: EntryPoint,
    pub body: Vec<Fragment>,
    pub result: Call,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.preamble)?;
        writeln!(f, "{}", self.entry)?;
        for fragment in &self.body {
            write!(f, "{fragment}")?;
        }
        writeln!(f, "{INDENT}{}", self.result)?;
        writeln!(f, "}}")
    }
}
