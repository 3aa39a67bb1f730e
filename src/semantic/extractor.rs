//! Reference extractor: collects every syntactic position in a tree where
//! an external type name could legally appear.
//!
//! The walk is a partial visitor: node kinds known to carry type-bearing
//! positions have explicit rules, control constructs are traversed to reach
//! nested positions, and grouping nodes fall back to their generic child
//! collection. The match is exhaustive over [`Node`] so adding a kind forces
//! a decision about whether it carries references.
//!
//! Candidates are not deduplicated here; the same name may be emitted many
//! times during one walk.

use smol_str::SmolStr;
use tracing::debug;

use crate::syntax::ast::{Name, Node, Param, Resolution, TypeHint};

/// The syntactic position a candidate was collected from. Diagnostic only;
/// resolution ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefContext {
    Extends,
    Implements,
    ParameterHint,
    Catch,
    New,
    StaticAccess,
    Instanceof,
}

/// A raw extracted candidate: a bare name plus where it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: SmolStr,
    pub context: RefContext,
}

/// Walk a syntax tree and collect all type-name candidates.
///
/// An empty tree produces an empty sequence; unrecognized constructs
/// contribute nothing rather than failing.
pub fn extract_references(root: &Node) -> Vec<TypeRef> {
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

fn walk(node: &Node, out: &mut Vec<TypeRef>) {
    match node {
        Node::Class {
            extends,
            implements,
            body,
            ..
        } => {
            if let Some(parent) = extends {
                push_name(parent, RefContext::Extends, out);
            }
            for interface in implements {
                push_name(interface, RefContext::Implements, out);
            }
            walk_all(body, out);
        }
        Node::Interface { extends, body, .. } => {
            for parent in extends {
                push_name(parent, RefContext::Extends, out);
            }
            walk_all(body, out);
        }
        Node::Method { params, body, .. } | Node::Closure { params, body } => {
            walk_params(params, out);
            walk_all(body, out);
        }
        Node::Property { default, .. } => {
            if let Some(value) = default {
                walk(value, out);
            }
        }
        Node::ClassConst { value, .. } => walk(value, out),

        Node::Try {
            body,
            catches,
            finalizer,
        } => {
            walk_all(body, out);
            for catch in catches {
                for caught in &catch.types {
                    push_name(caught, RefContext::Catch, out);
                }
                walk_all(&catch.body, out);
            }
            if let Some(finalizer) = finalizer {
                walk_all(finalizer, out);
            }
        }
        Node::If {
            test,
            body,
            alternate,
        } => {
            walk(test, out);
            walk(body, out);
            if let Some(alternate) = alternate {
                walk(alternate, out);
            }
        }
        Node::While { test, body } => {
            walk(test, out);
            walk(body, out);
        }
        Node::Foreach { source, body } => {
            walk(source, out);
            walk(body, out);
        }
        Node::For {
            init,
            test,
            increment,
            body,
        } => {
            walk_all(init, out);
            walk_all(test, out);
            walk_all(increment, out);
            walk(body, out);
        }
        Node::Switch { test, cases } => {
            walk(test, out);
            for case in cases {
                if let Some(case_test) = &case.test {
                    walk(case_test, out);
                }
                walk_all(&case.body, out);
            }
        }
        Node::Return { expr } => {
            if let Some(expr) = expr {
                walk(expr, out);
            }
        }
        Node::Throw { what } => walk(what, out),
        Node::Echo { expressions } => walk_all(expressions, out),
        Node::Ternary {
            test,
            true_expr,
            false_expr,
        } => {
            walk(test, out);
            if let Some(true_expr) = true_expr {
                walk(true_expr, out);
            }
            walk(false_expr, out);
        }
        Node::Binary { left, right, .. } => {
            walk(left, out);
            walk(right, out);
        }
        Node::Assign { left, right } => {
            walk(left, out);
            walk(right, out);
        }
        Node::Unary { expr, .. } => walk(expr, out),
        Node::ArrayLiteral { entries } => {
            // Only entry values; keys are plain scalars in practice
            for entry in entries {
                walk(&entry.value, out);
            }
        }

        Node::New {
            class_name,
            arguments,
        } => {
            if let Some(class_name) = class_name {
                push_name(class_name, RefContext::New, out);
            }
            walk_all(arguments, out);
        }
        Node::Call { callee, arguments } => {
            walk(callee, out);
            walk_all(arguments, out);
        }
        Node::StaticLookup { class_name, .. } => {
            push_name(class_name, RefContext::StaticAccess, out);
        }
        Node::Instanceof { left, class_name } => {
            walk(left, out);
            push_name(class_name, RefContext::Instanceof, out);
        }
        Node::PropertyLookup { object, .. } => walk(object, out),
        Node::ExpressionStatement { expression } => walk(expression, out),

        // No type semantics of their own; leaves contribute nothing
        Node::Use { .. }
        | Node::Variable { .. }
        | Node::NameExpr { .. }
        | Node::StringLit { .. }
        | Node::NumberLit { .. }
        | Node::BoolLit { .. }
        | Node::NullLit => {}

        // Grouping nodes: recurse into the generic child collection
        Node::Program { .. } | Node::Namespace { .. } | Node::Block { .. } => {
            if let Some(children) = node.child_nodes() {
                walk_all(children, out);
            }
        }
    }
}

fn walk_all(nodes: &[Node], out: &mut Vec<TypeRef>) {
    for node in nodes {
        walk(node, out);
    }
}

fn walk_params(params: &[Param], out: &mut Vec<TypeRef>) {
    for param in params {
        if let Some(TypeHint::Named(name)) = &param.hint {
            push_name(name, RefContext::ParameterHint, out);
        }
        if let Some(default) = &param.default {
            walk(default, out);
        }
    }
}

/// Emit a candidate for a name at a type-bearing position, unless it is a
/// relative `self`/`parent`/`static` reference. Names already fully
/// qualified at the use site need no lookup; they are logged for manual
/// review and still contribute their bare segment. Qualified names
/// (`Sub\Logger`) resolve against the current namespace, not the index:
/// collapsing them to the bare segment could match an unrelated type, so
/// their full text is kept and survives resolution unchanged.
fn push_name(name: &Name, context: RefContext, out: &mut Vec<TypeRef>) {
    match name.resolution {
        Resolution::Special => {}
        Resolution::FullyQualified => {
            debug!(name = %name.text, ?context, "fully qualified at use site");
            out.push(TypeRef {
                name: SmolStr::new(name.bare()),
                context,
            });
        }
        Resolution::Qualified => {
            debug!(name = %name.text, ?context, "namespace-relative at use site");
            out.push(TypeRef {
                name: name.text.clone(),
                context,
            });
        }
        Resolution::Unqualified => {
            out.push(TypeRef {
                name: SmolStr::new(name.bare()),
                context,
            });
        }
    }
}
