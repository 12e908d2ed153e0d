//! Front-end for the equation (`.eqn`) netlist format.
//!
//! ```text
//! INORDER = a b c;
//! OUTORDER = f;
//! n1 = a * !b;
//! n2 = (n1 * !c) + (!n1 * c);
//! f = n2 + b;
//! ```
//!
//! Statements end with `;` and may span lines.  `#` starts a comment.  `*` is
//! AND, `^` is XOR and `+` is OR, `!` negates an identifier or a `0`/`1`
//! literal.  Every right-hand side is parsed into an [`ExprArena`] and then
//! lowered by [`crate::normalize::lower`], so only the shapes accepted there
//! make it into a [`Circuit`].

use tracing::debug;

use crate::circuit::{Circuit, Equation};
use crate::error::IrError;
use crate::expr::*;
use crate::normalize;

/// Parsed contents of an equation file before normalization.
#[derive(Clone, Debug, Default)]
pub struct EqnFile {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,

    /// Defined net and the root of its right-hand side, in file order.
    pub definitions: Vec<(String, NodeId)>,

    /// Owner of every right-hand side node.
    pub arena: ExprArena,
}

impl EqnFile {
    /// Lowers every definition and validates the result.
    pub fn into_circuit(self) -> Result<Circuit, IrError> {
        let equations = self
            .definitions
            .iter()
            .map(|(net, root)| -> Result<Equation, IrError> {
                Ok(Equation::new(net, normalize::lower(&self.arena, net, *root)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Circuit::new(self.inputs, self.outputs, equations)
    }
}

/// Parses equation text and builds a validated circuit.
pub fn parse_circuit(src: &str) -> Result<Circuit, IrError> {
    parse_eqn(src)?.into_circuit()
}

/// Parses equation text without normalizing it.
pub fn parse_eqn(src: &str) -> Result<EqnFile, IrError> {
    let mut file = EqnFile::default();
    let mut seen_inorder = false;
    let mut seen_outorder = false;

    for (line, stmt) in statements(src)? {
        let Some((lhs, rhs)) = stmt.split_once('=') else {
            return Err(parse_err(line, format!("expected `=` in `{stmt}`")));
        };
        let lhs = lhs.trim();

        match lhs {
            "INORDER" => {
                if seen_inorder {
                    return Err(parse_err(line, "duplicate INORDER"));
                }
                seen_inorder = true;
                file.inputs = rhs.split_whitespace().map(str::to_owned).collect();
            }

            "OUTORDER" => {
                if seen_outorder {
                    return Err(parse_err(line, "duplicate OUTORDER"));
                }
                seen_outorder = true;
                file.outputs = rhs.split_whitespace().map(str::to_owned).collect();
            }

            net => {
                if !is_ident(net) {
                    return Err(parse_err(line, format!("invalid net name `{net}`")));
                }
                let tokens = lex(line, rhs)?;
                let root = ExprParser::new(line, &tokens, &mut file.arena).parse_root()?;
                file.definitions.push((net.to_owned(), root));
            }
        }
    }

    if !seen_inorder {
        return Err(parse_err(1, "missing INORDER"));
    }
    if !seen_outorder {
        return Err(parse_err(1, "missing OUTORDER"));
    }

    debug!(
        inputs = file.inputs.len(),
        outputs = file.outputs.len(),
        equations = file.definitions.len(),
        nodes = file.arena.len(),
        "parsed equation file"
    );

    Ok(file)
}

fn parse_err(line: usize, message: impl Into<String>) -> IrError {
    IrError::Parse {
        line,
        message: message.into(),
    }
}

/// Splits the source into `;`-terminated statements, tagged with the line
/// each one starts on.
fn statements(src: &str) -> Result<Vec<(usize, String)>, IrError> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut start_line = 0;

    for (i, raw) in src.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or_default();

        let mut rest = line;
        while !rest.is_empty() {
            if cur.trim().is_empty() {
                start_line = line_no;
            }
            match rest.split_once(';') {
                Some((stmt, tail)) => {
                    cur.push_str(stmt);
                    let s = cur.trim();
                    if !s.is_empty() {
                        out.push((start_line, s.to_owned()));
                    }
                    cur.clear();
                    rest = tail;
                }
                None => {
                    cur.push_str(rest);
                    cur.push(' ');
                    rest = "";
                }
            }
        }
    }

    if !cur.trim().is_empty() {
        return Err(parse_err(start_line, "statement is missing a terminating `;`"));
    }

    Ok(out)
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']' | '.' | '$'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Lit(bool),
    Not,
    And,
    Xor,
    Or,
    LParen,
    RParen,
}

fn lex(line: usize, src: &str) -> Result<Vec<Token>, IrError> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(&c) = chars.peek() {
        let tok = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '!' => Token::Not,
            '*' => Token::And,
            '^' => Token::Xor,
            '+' => Token::Or,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || "!*^+()".contains(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }

                tokens.push(match word.as_str() {
                    "0" => Token::Lit(false),
                    "1" => Token::Lit(true),
                    w if is_ident(w) => Token::Ident(word),
                    _ => return Err(parse_err(line, format!("unexpected `{word}`"))),
                });
                continue;
            }
        };
        chars.next();
        tokens.push(tok);
    }

    Ok(tokens)
}

/// Recursive-descent parser over one right-hand side.
///
/// ```text
/// sum     := product ('+' product)*
/// product := factor (('*' | '^') factor)*
/// factor  := '!' factor | '(' sum ')' | ident | literal
/// ```
struct ExprParser<'t, 'a> {
    line: usize,
    tokens: &'t [Token],
    pos: usize,
    arena: &'a mut ExprArena,
}

impl<'t, 'a> ExprParser<'t, 'a> {
    fn new(line: usize, tokens: &'t [Token], arena: &'a mut ExprArena) -> Self {
        Self {
            line,
            tokens,
            pos: 0,
            arena,
        }
    }

    fn parse_root(mut self) -> Result<NodeId, IrError> {
        if self.tokens.is_empty() {
            return Err(parse_err(self.line, "empty right-hand side"));
        }

        let root = self.sum()?;
        if let Some(tok) = self.peek() {
            return Err(parse_err(self.line, format!("unexpected {tok:?}")));
        }

        // A bare operand is a pass-through.
        if self.arena.get(root).is_leaf() {
            return Ok(self.arena.wire(root));
        }
        Ok(root)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn sum(&mut self) -> Result<NodeId, IrError> {
        let mut left = self.product()?;
        while self.peek() == Some(&Token::Or) {
            self.bump();
            let right = self.product()?;
            let l = self.wrap_leaf(left);
            let r = self.wrap_leaf(right);
            left = self.arena.binary(ExprOp::UnsafeOr, l, r);
        }
        Ok(left)
    }

    fn product(&mut self) -> Result<NodeId, IrError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::And) => ExprOp::AND,
                Some(Token::Xor) => ExprOp::XOR,
                _ => return Ok(left),
            };
            self.bump();
            let right = self.factor()?;
            left = self.arena.binary(op, left, right);
        }
    }

    fn factor(&mut self) -> Result<NodeId, IrError> {
        match self.bump() {
            Some(Token::Not) => {
                let inner = self.factor()?;
                match self.arena.get(inner).clone() {
                    Node::Input { name, negated } => Ok(self.arena.input(name, !negated)),
                    Node::Constant { value } => Ok(self.arena.constant(!value)),
                    Node::Gate { .. } => Err(parse_err(
                        self.line,
                        "negating a sub-expression is not supported",
                    )),
                }
            }
            Some(Token::LParen) => {
                let inner = self.sum()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(parse_err(self.line, "expected `)`")),
                }
            }
            Some(Token::Ident(name)) => Ok(self.arena.input(name, false)),
            Some(Token::Lit(value)) => Ok(self.arena.constant(value)),
            Some(tok) => Err(parse_err(self.line, format!("unexpected {tok:?}"))),
            None => Err(parse_err(self.line, "unexpected end of expression")),
        }
    }

    /// OR operands that are bare leaves become WIRE nodes, which is the shape
    /// the normalizer expects for a plain OR.
    fn wrap_leaf(&mut self, id: NodeId) -> NodeId {
        if self.arena.get(id).is_leaf() {
            self.arena.wire(id)
        } else {
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::*;

    #[test]
    fn test_statements_span_lines() {
        let src = "INORDER = a\n  b c;\nOUTORDER = x; # trailing\n\nx = a;";
        let stmts = statements(src).unwrap();
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].0, 1);
        assert_eq!(stmts[1], (3, "OUTORDER = x".to_owned()));
        assert_eq!(stmts[2], (5, "x = a".to_owned()));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = statements("INORDER = a;\nx = a").unwrap_err();
        assert!(matches!(err, IrError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_lex() {
        let toks = lex(1, "(!a_1 * 0) + b").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::LParen,
                Token::Not,
                Token::Ident("a_1".into()),
                Token::And,
                Token::Lit(false),
                Token::RParen,
                Token::Or,
                Token::Ident("b".into()),
            ]
        );
        assert!(lex(1, "a & b").is_err());
    }

    #[test]
    fn test_parse_gates() {
        let src = "\
INORDER = a b;
OUTORDER = x o w k;
x = (a * !b) + (!a * b);
o = a + !b;
w = !x;
k = !0;
";
        let c = parse_circuit(src).unwrap();
        let gates = c.equations().iter().map(|e| e.gate().clone()).collect::<Vec<_>>();
        assert_eq!(
            gates,
            vec![
                Gate::xor(Operand::net("a"), Operand::net("b")),
                Gate::or(Operand::net("a"), Operand::not_net("b")),
                Gate::wire(Operand::not_net("x")),
                Gate::wire(Operand::constant(true)),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_eqn("OUTORDER = x;\nx = 1;").unwrap_err(),
            IrError::Parse { .. }
        ));
        assert!(matches!(
            parse_eqn("INORDER = a;\nOUTORDER = x;\nx = a *;").unwrap_err(),
            IrError::Parse { line: 3, .. }
        ));
        assert!(matches!(
            parse_eqn("INORDER = a;\nOUTORDER = x;\nx = !(a * a);").unwrap_err(),
            IrError::Parse { .. }
        ));
        assert!(matches!(
            parse_eqn("INORDER = a;\nOUTORDER = x;\nx = (a * a;").unwrap_err(),
            IrError::Parse { .. }
        ));
    }

    #[test]
    fn test_triple_or_is_unsupported() {
        let err = parse_circuit("INORDER = a b c;\nOUTORDER = x;\nx = a + b + c;").unwrap_err();
        assert!(matches!(err, IrError::UnsupportedOrPattern { .. }), "{err}");
    }
}
