//! AST node types for the PHP subset.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// How a name was written at its use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Plain bare name: `Logger`
    Unqualified,
    /// Relative to the current namespace: `Sub\Logger`
    Qualified,
    /// Anchored at the global root: `\App\Logger`
    FullyQualified,
    /// `self`, `parent`, `static` — resolved against the enclosing class
    Special,
}

/// A (possibly qualified) name at a use site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Segments joined with `\`, without any leading separator.
    pub text: SmolStr,
    pub resolution: Resolution,
}

impl Name {
    pub fn new(text: impl Into<SmolStr>, resolution: Resolution) -> Self {
        Self {
            text: text.into(),
            resolution,
        }
    }

    pub fn unqualified(text: impl Into<SmolStr>) -> Self {
        Self::new(text, Resolution::Unqualified)
    }

    /// The final segment, without any namespace prefix.
    pub fn bare(&self) -> &str {
        self.text.rsplit('\\').next().unwrap_or(&self.text)
    }
}

/// A declared parameter type hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// Built-in hint (`string`, `int`, `array`, …) — never a type reference.
    Builtin(SmolStr),
    /// Class or interface name.
    Named(Name),
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: SmolStr,
    pub hint: Option<TypeHint>,
    pub default: Option<Node>,
}

/// One `catch (A | B $e) { … }` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub types: Vec<Name>,
    pub var: Option<SmolStr>,
    pub body: Vec<Node>,
}

/// An element of an array literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
    pub key: Option<Node>,
    pub value: Node,
}

/// One `case expr:` (or `default:`) arm of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Node>,
    pub body: Vec<Node>,
}

/// A syntax tree node.
///
/// The variants form a closed set; the reference extractor matches all of
/// them without a wildcard arm. Variants that only group other nodes
/// (`Program`, `Namespace`, `Block`) expose their children through
/// [`Node::child_nodes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root of a parsed file.
    Program { children: Vec<Node> },
    /// `namespace A\B;` — non-braced form owns the rest of the file.
    Namespace { name: String, children: Vec<Node> },
    /// `use A\B\C;` or `use A\B as C;`
    Use { path: String, alias: Option<SmolStr> },

    /// Class declaration.
    Class {
        name: SmolStr,
        extends: Option<Name>,
        implements: Vec<Name>,
        body: Vec<Node>,
    },
    /// Interface declaration.
    Interface {
        name: SmolStr,
        extends: Vec<Name>,
        body: Vec<Node>,
    },
    /// Class method or free function (abstract methods have an empty body).
    Method {
        name: SmolStr,
        params: Vec<Param>,
        body: Vec<Node>,
    },
    /// Anonymous function.
    Closure { params: Vec<Param>, body: Vec<Node> },
    /// Class property declaration.
    Property {
        name: SmolStr,
        default: Option<Box<Node>>,
    },
    /// Class constant.
    ClassConst { name: SmolStr, value: Box<Node> },

    /// `{ … }`
    Block { children: Vec<Node> },
    /// A bare expression in statement position.
    ExpressionStatement { expression: Box<Node> },
    If {
        test: Box<Node>,
        body: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    While { test: Box<Node>, body: Box<Node> },
    Foreach { source: Box<Node>, body: Box<Node> },
    For {
        init: Vec<Node>,
        test: Vec<Node>,
        increment: Vec<Node>,
        body: Box<Node>,
    },
    Switch {
        test: Box<Node>,
        cases: Vec<SwitchCase>,
    },
    Try {
        body: Vec<Node>,
        catches: Vec<CatchClause>,
        finalizer: Option<Vec<Node>>,
    },
    Return { expr: Option<Box<Node>> },
    Throw { what: Box<Node> },
    Echo { expressions: Vec<Node> },

    Ternary {
        test: Box<Node>,
        /// `None` for the short form `a ?: b`.
        true_expr: Option<Box<Node>>,
        false_expr: Box<Node>,
    },
    Binary {
        op: SmolStr,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign { left: Box<Node>, right: Box<Node> },
    Unary { op: SmolStr, expr: Box<Node> },
    /// `new T(…)`; `class_name` is `None` for dynamic targets (`new $cls`).
    New {
        class_name: Option<Name>,
        arguments: Vec<Node>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    /// `T::member`, `T::CONST`, `T::$prop`
    StaticLookup { class_name: Name, member: SmolStr },
    Instanceof { left: Box<Node>, class_name: Name },
    /// `$obj->prop` / `$obj->method` (the callee half of a method call).
    PropertyLookup { object: Box<Node>, property: SmolStr },
    ArrayLiteral { entries: Vec<ArrayEntry> },
    /// `$name`
    Variable { name: SmolStr },
    /// Bare name in expression position (constant or function reference).
    NameExpr { name: Name },
    StringLit { value: String },
    NumberLit { value: SmolStr },
    BoolLit { value: bool },
    NullLit,
}

impl Node {
    /// Generic child collection for grouping nodes, `None` for everything
    /// else. Used by the extractor's fallback arm.
    pub fn child_nodes(&self) -> Option<&[Node]> {
        match self {
            Node::Program { children }
            | Node::Namespace { children, .. }
            | Node::Block { children } => Some(children),
            _ => None,
        }
    }
}

/// Collect the names of all classes and interfaces declared anywhere in
/// the tree. Local declarations shadow the project-wide index during
/// resolution.
pub fn declared_type_names(root: &Node) -> FxHashSet<SmolStr> {
    let mut names = FxHashSet::default();
    collect_declared(root, &mut names);
    names
}

fn collect_declared(node: &Node, names: &mut FxHashSet<SmolStr>) {
    match node {
        Node::Class { name, .. } | Node::Interface { name, .. } => {
            names.insert(name.clone());
        }
        // Legacy trees guard declarations behind class_exists() checks
        Node::If {
            body, alternate, ..
        } => {
            collect_declared(body, names);
            if let Some(alt) = alternate {
                collect_declared(alt, names);
            }
        }
        // Or wrap them in an init function
        Node::Method { body, .. } | Node::Closure { body, .. } => {
            for child in body {
                collect_declared(child, names);
            }
        }
        _ => {}
    }
    if let Some(children) = node.child_nodes() {
        for child in children {
            collect_declared(child, names);
        }
    }
}
