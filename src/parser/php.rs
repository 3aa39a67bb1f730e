//! Recursive-descent parser for the PHP subset.
//!
//! The parser never fails hard: unexpected input is recorded as a
//! [`SyntaxError`] and skipped to the next statement boundary, so a
//! malformed construct costs at most the references inside it.

use smol_str::SmolStr;
use tracing::trace;

use super::lexer::{Token, TokenKind, php_code, tokenize};
use crate::syntax::ast::{
    ArrayEntry, CatchClause, Name, Node, Param, Resolution, SwitchCase, TypeHint,
};

/// A recovered-from parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

/// Result of parsing one file: the tree plus any recovered-from errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub root: Node,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a PHP source file (inline HTML allowed) into a syntax tree.
pub fn parse_php(source: &str) -> Parse {
    let code = php_code(source);
    let tokens = tokenize(&code);
    let mut parser = Parser::new(&tokens);
    let children = parser.parse_program();
    trace!(
        nodes = children.len(),
        errors = parser.errors.len(),
        "parsed file"
    );
    Parse {
        root: Node::Program { children },
        errors: parser.errors,
    }
}

/// Built-in parameter hints that can never be class references.
const BUILTIN_HINTS: &[&str] = &[
    "string", "int", "integer", "float", "double", "bool", "boolean", "array", "callable",
    "iterable", "object", "mixed", "void", "never", "null", "false", "true",
];

/// Cast targets for `(int)$x`-style expressions.
const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "array", "object",
    "unset", "binary",
];

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    // ============================================================
    // Token helpers
    // ============================================================

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// PHP keywords are case-insensitive.
    fn at_kw(&self, kw: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case(kw))
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {what}"));
            false
        }
    }

    fn error(&mut self, message: String) {
        let offset = self.peek().map(|t| t.offset).unwrap_or_default();
        self.errors.push(SyntaxError { message, offset });
    }

    /// Skip to the next statement boundary: past a `;`, or up to a `}` that
    /// closes an enclosing block. Brackets opened while skipping are
    /// balanced so recovery does not resynchronize inside them.
    fn recover(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ============================================================
    // Program and declarations
    // ============================================================

    fn parse_program(&mut self) -> Vec<Node> {
        let mut children = Vec::new();
        while !self.at_eof() {
            let before = self.pos;
            if let Some(node) = self.parse_top_statement() {
                children.push(node);
            }
            if self.pos == before {
                // No rule consumed anything; force progress
                self.bump();
            }
        }
        children
    }

    fn parse_top_statement(&mut self) -> Option<Node> {
        if self.at_kw("namespace") {
            return self.parse_namespace();
        }
        if self.at_kw("use") {
            return self.parse_use();
        }
        self.parse_statement()
    }

    fn parse_namespace(&mut self) -> Option<Node> {
        self.bump(); // namespace
        let mut segments = Vec::new();
        while self.at(TokenKind::Ident) {
            segments.push(self.bump().unwrap().text.to_string());
            if !self.eat(TokenKind::Backslash) {
                break;
            }
        }
        let name = segments.join("\\");

        let mut children = Vec::new();
        if self.eat(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) && !self.at_eof() {
                let before = self.pos;
                if let Some(node) = self.parse_top_statement() {
                    children.push(node);
                }
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect(TokenKind::RBrace, "`}` closing namespace");
        } else {
            self.expect(TokenKind::Semicolon, "`;` after namespace name");
            // Non-braced form owns the rest of the file
            while !self.at_eof() {
                let before = self.pos;
                if let Some(node) = self.parse_top_statement() {
                    children.push(node);
                }
                if self.pos == before {
                    self.bump();
                }
            }
        }
        Some(Node::Namespace { name, children })
    }

    /// `use A\B\C;` / `use A\B as C;` / `use A\B, C\D;`
    fn parse_use(&mut self) -> Option<Node> {
        self.bump(); // use
        let mut decls = Vec::new();
        loop {
            self.eat(TokenKind::Backslash);
            let mut segments = Vec::new();
            while self.at(TokenKind::Ident) {
                segments.push(self.bump().unwrap().text.to_string());
                if !self.eat(TokenKind::Backslash) {
                    break;
                }
            }
            if segments.is_empty() {
                self.error("expected name in use declaration".into());
                self.recover();
                break;
            }
            let alias = if self.eat_kw("as") {
                self.at(TokenKind::Ident)
                    .then(|| SmolStr::new(self.bump().unwrap().text))
            } else {
                None
            };
            decls.push(Node::Use {
                path: segments.join("\\"),
                alias,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "`;` after use declaration");

        match decls.len() {
            0 => None,
            1 => decls.pop(),
            _ => Some(Node::Block { children: decls }),
        }
    }

    fn parse_class(&mut self) -> Option<Node> {
        // `class`, `trait`, or the tail of `abstract|final class`
        self.bump();
        let name = if self.at(TokenKind::Ident) {
            SmolStr::new(self.bump().unwrap().text)
        } else {
            self.error("expected class name".into());
            self.recover();
            return None;
        };

        let extends = if self.eat_kw("extends") {
            self.parse_name()
        } else {
            None
        };

        let mut implements = Vec::new();
        if self.eat_kw("implements") {
            loop {
                match self.parse_name() {
                    Some(name) => implements.push(name),
                    None => break,
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let body = self.parse_class_body();
        Some(Node::Class {
            name,
            extends,
            implements,
            body,
        })
    }

    fn parse_interface(&mut self) -> Option<Node> {
        self.bump(); // interface
        let name = if self.at(TokenKind::Ident) {
            SmolStr::new(self.bump().unwrap().text)
        } else {
            self.error("expected interface name".into());
            self.recover();
            return None;
        };

        let mut extends = Vec::new();
        if self.eat_kw("extends") {
            loop {
                match self.parse_name() {
                    Some(name) => extends.push(name),
                    None => break,
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }

        let body = self.parse_class_body();
        Some(Node::Interface {
            name,
            extends,
            body,
        })
    }

    fn parse_class_body(&mut self) -> Vec<Node> {
        let mut members = Vec::new();
        if !self.expect(TokenKind::LBrace, "`{` opening body") {
            return members;
        }
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            self.parse_member(&mut members);
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing body");
        members
    }

    fn parse_member(&mut self, members: &mut Vec<Node>) {
        // Modifiers carry no reference information
        while self.at_kw("public")
            || self.at_kw("protected")
            || self.at_kw("private")
            || self.at_kw("static")
            || self.at_kw("abstract")
            || self.at_kw("final")
            || self.at_kw("readonly")
            || self.at_kw("var")
        {
            self.bump();
        }

        if self.at_kw("const") {
            self.bump();
            loop {
                let name = if self.at(TokenKind::Ident) {
                    SmolStr::new(self.bump().unwrap().text)
                } else {
                    self.error("expected constant name".into());
                    self.recover();
                    return;
                };
                if !self.expect(TokenKind::Eq, "`=` in constant") {
                    self.recover();
                    return;
                }
                let value = self.parse_expr();
                members.push(Node::ClassConst {
                    name,
                    value: Box::new(value),
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon, "`;` after constant");
            return;
        }

        if self.at_kw("function") {
            self.bump();
            self.eat(TokenKind::Amp); // by-ref return
            let name = if self.at(TokenKind::Ident) {
                SmolStr::new(self.bump().unwrap().text)
            } else {
                self.error("expected method name".into());
                self.recover();
                return;
            };
            let params = self.parse_params();
            self.skip_return_type();
            let body = if self.at(TokenKind::LBrace) {
                self.parse_block_children()
            } else {
                // Abstract or interface method
                self.expect(TokenKind::Semicolon, "method body or `;`");
                Vec::new()
            };
            members.push(Node::Method { name, params, body });
            return;
        }

        // Trait use: consumed, contributes nothing
        if self.at_kw("use") {
            self.bump();
            while !self.at(TokenKind::Semicolon)
                && !self.at(TokenKind::LBrace)
                && !self.at_eof()
            {
                self.bump();
            }
            if self.eat(TokenKind::LBrace) {
                let mut depth = 1usize;
                while depth > 0 && !self.at_eof() {
                    match self.bump().map(|t| t.kind) {
                        Some(TokenKind::LBrace) => depth += 1,
                        Some(TokenKind::RBrace) => depth -= 1,
                        _ => {}
                    }
                }
            } else {
                self.eat(TokenKind::Semicolon);
            }
            return;
        }

        // Typed property: the hint is consumed but not a dispatch position
        if (self.at(TokenKind::Ident) || self.at(TokenKind::Backslash) || self.at(TokenKind::Question))
            && !self.at(TokenKind::Variable)
        {
            self.eat(TokenKind::Question);
            self.skip_type_expr();
        }

        if self.at(TokenKind::Variable) {
            loop {
                let var = self.bump().unwrap();
                let name = SmolStr::new(var.text.trim_start_matches('$'));
                let default = self
                    .eat(TokenKind::Eq)
                    .then(|| Box::new(self.parse_expr()));
                members.push(Node::Property { name, default });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon, "`;` after property");
            return;
        }

        self.error("unexpected token in class body".into());
        self.recover();
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if !self.expect(TokenKind::LParen, "`(` opening parameter list") {
            return params;
        }
        while !self.at(TokenKind::RParen) && !self.at_eof() {
            let before = self.pos;

            // Constructor promotion modifiers
            while self.at_kw("public") || self.at_kw("protected") || self.at_kw("private") {
                self.bump();
            }

            self.eat(TokenKind::Question);
            let hint = self.parse_type_hint();

            self.eat(TokenKind::Amp); // by-ref
            self.eat(TokenKind::Ellipsis); // variadic

            if self.at(TokenKind::Variable) {
                let var = self.bump().unwrap();
                let default = self.eat(TokenKind::Eq).then(|| self.parse_expr());
                params.push(Param {
                    name: SmolStr::new(var.text.trim_start_matches('$')),
                    hint,
                    default,
                });
            } else {
                self.error("expected parameter variable".into());
            }

            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RParen, "`)` closing parameter list");
        params
    }

    /// One hint: a builtin keyword or a class name. Extra `|`/`&` union
    /// parts are consumed; only the first named part is kept.
    fn parse_type_hint(&mut self) -> Option<TypeHint> {
        if !self.at(TokenKind::Ident) && !self.at(TokenKind::Backslash) {
            return None;
        }
        // `$x` follows immediately when there is no hint at all
        let first = self.parse_name()?;
        let hint = if first.resolution == Resolution::Unqualified
            && BUILTIN_HINTS
                .iter()
                .any(|b| first.text.eq_ignore_ascii_case(b))
        {
            TypeHint::Builtin(first.text)
        } else {
            TypeHint::Named(first)
        };
        while self.eat(TokenKind::Pipe) || self.eat(TokenKind::Amp) {
            self.eat(TokenKind::Question);
            if self.parse_name().is_none() {
                break;
            }
        }
        Some(hint)
    }

    fn skip_return_type(&mut self) {
        if self.eat(TokenKind::Colon) {
            self.eat(TokenKind::Question);
            self.skip_type_expr();
        }
    }

    fn skip_type_expr(&mut self) {
        let _ = self.parse_type_hint();
    }

    // ============================================================
    // Statements
    // ============================================================

    fn parse_statement(&mut self) -> Option<Node> {
        if self.at(TokenKind::Semicolon) {
            self.bump();
            return None;
        }
        if self.at(TokenKind::LBrace) {
            return Some(Node::Block {
                children: self.parse_block_children(),
            });
        }
        if self.at_kw("abstract") || self.at_kw("final") {
            self.bump();
            while self.at_kw("abstract") || self.at_kw("final") {
                self.bump();
            }
            if self.at_kw("class") {
                return self.parse_class();
            }
            self.error("expected `class` after modifier".into());
            self.recover();
            return None;
        }
        if self.at_kw("class") || self.at_kw("trait") {
            return self.parse_class();
        }
        if self.at_kw("interface") {
            return self.parse_interface();
        }
        if self.at_kw("function") && !self.closure_ahead() {
            self.bump();
            self.eat(TokenKind::Amp);
            let name = if self.at(TokenKind::Ident) {
                SmolStr::new(self.bump().unwrap().text)
            } else {
                self.error("expected function name".into());
                self.recover();
                return None;
            };
            let params = self.parse_params();
            self.skip_return_type();
            let body = self.parse_block_children();
            return Some(Node::Method { name, params, body });
        }
        if self.at_kw("if") {
            return self.parse_if();
        }
        if self.at_kw("while") {
            self.bump();
            let test = self.parse_paren_expr();
            let body = self.parse_statement_as_block();
            return Some(Node::While {
                test: Box::new(test),
                body: Box::new(body),
            });
        }
        if self.at_kw("do") {
            self.bump();
            let body = self.parse_statement_as_block();
            self.eat_kw("while");
            let test = self.parse_paren_expr();
            self.eat(TokenKind::Semicolon);
            return Some(Node::While {
                test: Box::new(test),
                body: Box::new(body),
            });
        }
        if self.at_kw("foreach") {
            return self.parse_foreach();
        }
        if self.at_kw("for") {
            return self.parse_for();
        }
        if self.at_kw("switch") {
            return self.parse_switch();
        }
        if self.at_kw("try") {
            return self.parse_try();
        }
        if self.at_kw("return") {
            self.bump();
            let expr = (!self.at(TokenKind::Semicolon) && !self.at_eof())
                .then(|| Box::new(self.parse_expr()));
            self.expect(TokenKind::Semicolon, "`;` after return");
            return Some(Node::Return { expr });
        }
        if self.at_kw("throw") {
            self.bump();
            let what = self.parse_expr();
            self.expect(TokenKind::Semicolon, "`;` after throw");
            return Some(Node::Throw {
                what: Box::new(what),
            });
        }
        if self.at_kw("echo") {
            self.bump();
            let mut expressions = vec![self.parse_expr()];
            while self.eat(TokenKind::Comma) {
                expressions.push(self.parse_expr());
            }
            self.expect(TokenKind::Semicolon, "`;` after echo");
            return Some(Node::Echo { expressions });
        }
        if self.at_kw("break") || self.at_kw("continue") {
            self.bump();
            self.eat(TokenKind::Number);
            self.expect(TokenKind::Semicolon, "`;`");
            return None;
        }
        if self.at_kw("global") {
            self.bump();
            self.recover();
            return None;
        }

        // Expression statement
        let expression = self.parse_expr();
        if !self.eat(TokenKind::Semicolon) {
            self.error("expected `;` after expression".into());
            self.recover();
        }
        Some(Node::ExpressionStatement {
            expression: Box::new(expression),
        })
    }

    /// `function (` (or `function &(`) is a closure, not a named function
    /// declaration.
    fn closure_ahead(&self) -> bool {
        match self.peek_nth(1).map(|t| t.kind) {
            Some(TokenKind::LParen) => true,
            Some(TokenKind::Amp) => self
                .peek_nth(2)
                .is_some_and(|t| t.kind == TokenKind::LParen),
            _ => false,
        }
    }

    fn parse_block_children(&mut self) -> Vec<Node> {
        let mut children = Vec::new();
        if !self.expect(TokenKind::LBrace, "`{` opening block") {
            return children;
        }
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            if let Some(node) = self.parse_statement() {
                children.push(node);
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing block");
        children
    }

    fn parse_statement_as_block(&mut self) -> Node {
        match self.parse_statement() {
            Some(node) => node,
            None => Node::Block {
                children: Vec::new(),
            },
        }
    }

    fn parse_paren_expr(&mut self) -> Node {
        self.expect(TokenKind::LParen, "`(`");
        let expr = self.parse_expr();
        self.expect(TokenKind::RParen, "`)`");
        expr
    }

    fn parse_if(&mut self) -> Option<Node> {
        self.bump(); // if / elseif
        let test = self.parse_paren_expr();
        let body = self.parse_statement_as_block();
        let alternate = if self.at_kw("elseif") {
            self.parse_if().map(Box::new)
        } else if self.eat_kw("else") {
            if self.at_kw("if") {
                self.parse_if().map(Box::new)
            } else {
                Some(Box::new(self.parse_statement_as_block()))
            }
        } else {
            None
        };
        Some(Node::If {
            test: Box::new(test),
            body: Box::new(body),
            alternate,
        })
    }

    fn parse_foreach(&mut self) -> Option<Node> {
        self.bump(); // foreach
        self.expect(TokenKind::LParen, "`(`");
        let source = self.parse_expr();
        self.eat_kw("as");
        // `$value` or `$key => $value`, possibly by-ref
        self.eat(TokenKind::Amp);
        self.eat(TokenKind::Variable);
        if self.eat(TokenKind::FatArrow) {
            self.eat(TokenKind::Amp);
            self.eat(TokenKind::Variable);
        }
        self.expect(TokenKind::RParen, "`)`");
        let body = self.parse_statement_as_block();
        Some(Node::Foreach {
            source: Box::new(source),
            body: Box::new(body),
        })
    }

    fn parse_for(&mut self) -> Option<Node> {
        self.bump(); // for
        self.expect(TokenKind::LParen, "`(`");
        let init = self.parse_expr_list_until(TokenKind::Semicolon);
        let test = self.parse_expr_list_until(TokenKind::Semicolon);
        let increment = self.parse_expr_list_until(TokenKind::RParen);
        let body = self.parse_statement_as_block();
        Some(Node::For {
            init,
            test,
            increment,
            body: Box::new(body),
        })
    }

    fn parse_expr_list_until(&mut self, end: TokenKind) -> Vec<Node> {
        let mut exprs = Vec::new();
        while !self.at(end) && !self.at_eof() {
            let before = self.pos;
            exprs.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) && !self.at(end) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.eat(end);
        exprs
    }

    fn parse_switch(&mut self) -> Option<Node> {
        self.bump(); // switch
        let test = self.parse_paren_expr();
        let mut cases = Vec::new();
        self.expect(TokenKind::LBrace, "`{` opening switch");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            if self.eat_kw("case") {
                let case_test = self.parse_expr();
                if !self.eat(TokenKind::Colon) {
                    self.eat(TokenKind::Semicolon);
                }
                cases.push(SwitchCase {
                    test: Some(case_test),
                    body: self.parse_case_body(),
                });
            } else if self.eat_kw("default") {
                if !self.eat(TokenKind::Colon) {
                    self.eat(TokenKind::Semicolon);
                }
                cases.push(SwitchCase {
                    test: None,
                    body: self.parse_case_body(),
                });
            } else if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing switch");
        Some(Node::Switch {
            test: Box::new(test),
            cases,
        })
    }

    fn parse_case_body(&mut self) -> Vec<Node> {
        let mut body = Vec::new();
        while !self.at(TokenKind::RBrace)
            && !self.at_kw("case")
            && !self.at_kw("default")
            && !self.at_eof()
        {
            let before = self.pos;
            if let Some(node) = self.parse_statement() {
                body.push(node);
            }
            if self.pos == before {
                self.bump();
            }
        }
        body
    }

    fn parse_try(&mut self) -> Option<Node> {
        self.bump(); // try
        let body = self.parse_block_children();

        let mut catches = Vec::new();
        while self.at_kw("catch") {
            self.bump();
            self.expect(TokenKind::LParen, "`(` after catch");
            let mut types = Vec::new();
            loop {
                match self.parse_name() {
                    Some(name) => types.push(name),
                    None => break,
                }
                if !self.eat(TokenKind::Pipe) {
                    break;
                }
            }
            let var = self
                .at(TokenKind::Variable)
                .then(|| SmolStr::new(self.bump().unwrap().text.trim_start_matches('$')));
            self.expect(TokenKind::RParen, "`)` after catch types");
            let catch_body = self.parse_block_children();
            catches.push(CatchClause {
                types,
                var,
                body: catch_body,
            });
        }

        let finalizer = self
            .eat_kw("finally")
            .then(|| self.parse_block_children());

        Some(Node::Try {
            body,
            catches,
            finalizer,
        })
    }

    // ============================================================
    // Expressions (precedence climbing)
    // ============================================================

    fn parse_expr(&mut self) -> Node {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Node {
        let left = self.parse_ternary();
        let is_assign = matches!(
            self.peek().map(|t| t.kind),
            Some(
                TokenKind::Eq
                    | TokenKind::PlusEq
                    | TokenKind::MinusEq
                    | TokenKind::StarEq
                    | TokenKind::SlashEq
                    | TokenKind::DotEq
                    | TokenKind::PercentEq
                    | TokenKind::AmpEq
                    | TokenKind::PipeEq
                    | TokenKind::PowEq
                    | TokenKind::CoalesceEq
            )
        );
        if is_assign {
            self.bump();
            let right = self.parse_assignment();
            return Node::Assign {
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_ternary(&mut self) -> Node {
        let test = self.parse_binary(0);
        if self.eat(TokenKind::Question) {
            let true_expr = if self.at(TokenKind::Colon) {
                None
            } else {
                Some(Box::new(self.parse_expr()))
            };
            self.expect(TokenKind::Colon, "`:` in ternary");
            let false_expr = self.parse_ternary();
            return Node::Ternary {
                test: Box::new(test),
                true_expr,
                false_expr: Box::new(false_expr),
            };
        }
        test
    }

    /// Binary operator precedence, loosest first.
    fn binary_op(&self, level: usize) -> Option<&'static str> {
        let token = self.peek()?;
        let op: Option<&'static str> = match level {
            0 => match token.kind {
                TokenKind::OrOr => Some("||"),
                TokenKind::Ident if token.text.eq_ignore_ascii_case("or") => Some("||"),
                TokenKind::Ident if token.text.eq_ignore_ascii_case("xor") => Some("xor"),
                _ => None,
            },
            1 => match token.kind {
                TokenKind::AndAnd => Some("&&"),
                TokenKind::Ident if token.text.eq_ignore_ascii_case("and") => Some("&&"),
                _ => None,
            },
            2 => (token.kind == TokenKind::Coalesce).then_some("??"),
            3 => match token.kind {
                TokenKind::Pipe => Some("|"),
                TokenKind::Caret => Some("^"),
                TokenKind::Amp => Some("&"),
                _ => None,
            },
            4 => match token.kind {
                TokenKind::EqEq => Some("=="),
                TokenKind::EqEqEq => Some("==="),
                TokenKind::BangEq | TokenKind::LtGt => Some("!="),
                TokenKind::BangEqEq => Some("!=="),
                _ => None,
            },
            5 => match token.kind {
                TokenKind::Lt => Some("<"),
                TokenKind::Gt => Some(">"),
                TokenKind::LtEq => Some("<="),
                TokenKind::GtEq => Some(">="),
                TokenKind::Spaceship => Some("<=>"),
                _ => None,
            },
            6 => match token.kind {
                TokenKind::Shl => Some("<<"),
                TokenKind::Shr => Some(">>"),
                _ => None,
            },
            7 => match token.kind {
                TokenKind::Plus => Some("+"),
                TokenKind::Minus => Some("-"),
                TokenKind::Dot => Some("."),
                _ => None,
            },
            8 => match token.kind {
                TokenKind::Star => Some("*"),
                TokenKind::Slash => Some("/"),
                TokenKind::Percent => Some("%"),
                TokenKind::Pow => Some("**"),
                _ => None,
            },
            _ => None,
        };
        op
    }

    const MAX_BINARY_LEVEL: usize = 8;

    fn parse_binary(&mut self, level: usize) -> Node {
        if level > Self::MAX_BINARY_LEVEL {
            return self.parse_instanceof();
        }
        let mut left = self.parse_binary(level + 1);
        while let Some(op) = self.binary_op(level) {
            self.bump();
            let right = self.parse_binary(level + 1);
            left = Node::Binary {
                op: SmolStr::new(op),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_instanceof(&mut self) -> Node {
        let mut left = self.parse_unary();
        while self.eat_kw("instanceof") {
            if self.at(TokenKind::Ident) || self.at(TokenKind::Backslash) {
                if let Some(class_name) = self.parse_name() {
                    left = Node::Instanceof {
                        left: Box::new(left),
                        class_name,
                    };
                    continue;
                }
            }
            // Dynamic target: `$x instanceof $cls`
            let right = self.parse_unary();
            left = Node::Binary {
                op: SmolStr::new("instanceof"),
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        left
    }

    fn parse_unary(&mut self) -> Node {
        if self.at_kw("new") {
            return self.parse_new();
        }
        for (kind, op) in [
            (TokenKind::Bang, "!"),
            (TokenKind::Minus, "-"),
            (TokenKind::Plus, "+"),
            (TokenKind::Tilde, "~"),
            (TokenKind::At, "@"),
            (TokenKind::Amp, "&"),
            (TokenKind::PlusPlus, "++"),
            (TokenKind::MinusMinus, "--"),
        ] {
            if self.at(kind) {
                self.bump();
                return Node::Unary {
                    op: SmolStr::new(op),
                    expr: Box::new(self.parse_unary()),
                };
            }
        }
        for kw in ["clone", "print", "require", "require_once", "include", "include_once"] {
            if self.at_kw(kw) {
                self.bump();
                return Node::Unary {
                    op: SmolStr::new(kw),
                    expr: Box::new(self.parse_expr()),
                };
            }
        }
        // Cast: `(int) $x`
        if self.at(TokenKind::LParen) {
            if let (Some(ident), Some(close)) = (self.peek_nth(1), self.peek_nth(2)) {
                if ident.kind == TokenKind::Ident
                    && close.kind == TokenKind::RParen
                    && CAST_TYPES.iter().any(|c| ident.text.eq_ignore_ascii_case(c))
                {
                    let op = SmolStr::new(ident.text.to_ascii_lowercase());
                    self.pos += 3;
                    return Node::Unary {
                        op,
                        expr: Box::new(self.parse_unary()),
                    };
                }
            }
        }
        self.parse_postfix()
    }

    fn parse_new(&mut self) -> Node {
        self.bump(); // new
        let class_name = if self.at(TokenKind::Variable) {
            self.bump();
            None
        } else if self.at_kw("class") {
            // Anonymous class: arguments and body are skipped
            self.bump();
            self.error("anonymous class not analyzed".into());
            if self.at(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            }
            self.recover();
            return Node::New {
                class_name: None,
                arguments: Vec::new(),
            };
        } else {
            self.parse_name()
        };
        let arguments = if self.at(TokenKind::LParen) {
            self.parse_arguments()
        } else {
            Vec::new()
        };
        let mut node = Node::New {
            class_name,
            arguments,
        };
        // `(new Foo())->bar()` style chains continue through postfix
        node = self.parse_postfix_ops(node);
        node
    }

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        if !self.eat(open) {
            return;
        }
        let mut depth = 1usize;
        while depth > 0 && !self.at_eof() {
            match self.bump().map(|t| t.kind) {
                Some(k) if k == open => depth += 1,
                Some(k) if k == close => depth -= 1,
                _ => {}
            }
        }
    }

    fn parse_arguments(&mut self) -> Vec<Node> {
        let mut arguments = Vec::new();
        self.expect(TokenKind::LParen, "`(` opening arguments");
        while !self.at(TokenKind::RParen) && !self.at_eof() {
            let before = self.pos;
            self.eat(TokenKind::Amp);
            self.eat(TokenKind::Ellipsis);
            arguments.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RParen, "`)` closing arguments");
        arguments
    }

    fn parse_postfix(&mut self) -> Node {
        let primary = self.parse_primary();
        self.parse_postfix_ops(primary)
    }

    fn parse_postfix_ops(&mut self, mut node: Node) -> Node {
        loop {
            if self.at(TokenKind::LParen) {
                let arguments = self.parse_arguments();
                node = Node::Call {
                    callee: Box::new(node),
                    arguments,
                };
                continue;
            }
            if self.eat(TokenKind::Arrow) {
                let property = match self.peek().map(|t| t.kind) {
                    Some(TokenKind::Ident) | Some(TokenKind::Variable) => {
                        SmolStr::new(self.bump().unwrap().text)
                    }
                    Some(TokenKind::LBrace) => {
                        self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                        SmolStr::new("{expr}")
                    }
                    _ => {
                        self.error("expected property name after `->`".into());
                        SmolStr::new("")
                    }
                };
                node = Node::PropertyLookup {
                    object: Box::new(node),
                    property,
                };
                continue;
            }
            if self.at(TokenKind::ColonColon) {
                self.bump();
                let member = match self.peek().map(|t| t.kind) {
                    Some(TokenKind::Ident) | Some(TokenKind::Variable) => {
                        SmolStr::new(self.bump().unwrap().text)
                    }
                    _ => {
                        self.error("expected member name after `::`".into());
                        SmolStr::new("")
                    }
                };
                node = match node {
                    Node::NameExpr { name } => Node::StaticLookup {
                        class_name: name,
                        member,
                    },
                    other => Node::PropertyLookup {
                        object: Box::new(other),
                        property: member,
                    },
                };
                continue;
            }
            if self.at(TokenKind::LBracket) {
                self.bump();
                if !self.at(TokenKind::RBracket) {
                    // The subscript itself is not a dispatch position
                    let _ = self.parse_expr();
                }
                self.expect(TokenKind::RBracket, "`]` closing subscript");
                continue;
            }
            if self.at(TokenKind::PlusPlus) || self.at(TokenKind::MinusMinus) {
                let op = SmolStr::new(self.bump().unwrap().text);
                node = Node::Unary {
                    op,
                    expr: Box::new(node),
                };
                continue;
            }
            break;
        }
        node
    }

    fn parse_primary(&mut self) -> Node {
        if let Some(token) = self.peek().copied() {
            match token.kind {
                TokenKind::Variable => {
                    self.bump();
                    return Node::Variable {
                        name: SmolStr::new(token.text.trim_start_matches('$')),
                    };
                }
                TokenKind::Number => {
                    self.bump();
                    return Node::NumberLit {
                        value: SmolStr::new(token.text),
                    };
                }
                TokenKind::SingleQuoted | TokenKind::DoubleQuoted => {
                    self.bump();
                    let inner = &token.text[1..token.text.len() - 1];
                    return Node::StringLit {
                        value: inner.to_string(),
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let expr = self.parse_expr();
                    self.expect(TokenKind::RParen, "`)`");
                    return expr;
                }
                TokenKind::LBracket => {
                    return self.parse_array_literal(TokenKind::RBracket);
                }
                TokenKind::Ident => {
                    if token.text.eq_ignore_ascii_case("true") {
                        self.bump();
                        return Node::BoolLit { value: true };
                    }
                    if token.text.eq_ignore_ascii_case("false") {
                        self.bump();
                        return Node::BoolLit { value: false };
                    }
                    if token.text.eq_ignore_ascii_case("null") {
                        self.bump();
                        return Node::NullLit;
                    }
                    if token.text.eq_ignore_ascii_case("array")
                        && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::LParen)
                    {
                        self.bump();
                        self.bump();
                        return self.parse_array_entries(TokenKind::RParen);
                    }
                    if token.text.eq_ignore_ascii_case("function") {
                        return self.parse_closure();
                    }
                    if token.text.eq_ignore_ascii_case("fn") {
                        return self.parse_arrow_fn();
                    }
                    if token.text.eq_ignore_ascii_case("static")
                        && self
                            .peek_nth(1)
                            .is_some_and(|t| t.kind == TokenKind::Ident && t.text.eq_ignore_ascii_case("function"))
                    {
                        self.bump();
                        return self.parse_closure();
                    }
                    if let Some(name) = self.parse_name() {
                        return Node::NameExpr { name };
                    }
                }
                TokenKind::Backslash => {
                    if let Some(name) = self.parse_name() {
                        return Node::NameExpr { name };
                    }
                }
                _ => {}
            }
        }

        self.error("expected expression".into());
        self.bump();
        Node::NullLit
    }

    fn parse_closure(&mut self) -> Node {
        self.bump(); // function
        self.eat(TokenKind::Amp);
        let params = self.parse_params();
        // Captured variables carry no type information
        if self.eat_kw("use") {
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
        }
        self.skip_return_type();
        let body = self.parse_block_children();
        Node::Closure { params, body }
    }

    fn parse_arrow_fn(&mut self) -> Node {
        self.bump(); // fn
        self.eat(TokenKind::Amp);
        let params = self.parse_params();
        self.skip_return_type();
        self.expect(TokenKind::FatArrow, "`=>` in arrow function");
        let expr = self.parse_expr();
        Node::Closure {
            params,
            body: vec![Node::Return {
                expr: Some(Box::new(expr)),
            }],
        }
    }

    fn parse_array_literal(&mut self, close: TokenKind) -> Node {
        self.bump(); // opening bracket
        self.parse_array_entries(close)
    }

    fn parse_array_entries(&mut self, close: TokenKind) -> Node {
        let mut entries = Vec::new();
        while !self.at(close) && !self.at_eof() {
            let before = self.pos;
            self.eat(TokenKind::Amp);
            let first = self.parse_expr();
            let entry = if self.eat(TokenKind::FatArrow) {
                self.eat(TokenKind::Amp);
                ArrayEntry {
                    key: Some(first),
                    value: self.parse_expr(),
                }
            } else {
                ArrayEntry {
                    key: None,
                    value: first,
                }
            };
            entries.push(entry);
            if !self.eat(TokenKind::Comma) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.eat(close);
        Node::ArrayLiteral { entries }
    }

    /// Parse a possibly qualified name: `Foo`, `Sub\Foo`, `\App\Foo`.
    /// `self`, `parent` and `static` get [`Resolution::Special`].
    fn parse_name(&mut self) -> Option<Name> {
        let fully_qualified = self.eat(TokenKind::Backslash);
        let mut segments: Vec<&str> = Vec::new();
        while self.at(TokenKind::Ident) {
            segments.push(self.bump().unwrap().text);
            if !self.at(TokenKind::Backslash) {
                break;
            }
            // Stop at `use`-style separators only when another segment follows
            if self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Ident) {
                self.bump();
            } else {
                break;
            }
        }
        if segments.is_empty() {
            if fully_qualified {
                self.error("expected name after `\\`".into());
            }
            return None;
        }

        let text = segments.join("\\");
        let resolution = if fully_qualified {
            Resolution::FullyQualified
        } else if segments.len() > 1 {
            Resolution::Qualified
        } else if ["self", "parent", "static"]
            .iter()
            .any(|s| segments[0].eq_ignore_ascii_case(s))
        {
            Resolution::Special
        } else {
            Resolution::Unqualified
        };
        Some(Name::new(text, resolution))
    }
}
