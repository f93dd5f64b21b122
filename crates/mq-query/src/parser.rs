//! Recursive-descent parser from lexemes to [`SelectStatement`].
//!
//! Predicate precedence, loosest first: `OR`, `AND`, `NOT`, then the
//! comparison-style conditions. Parentheses group predicates.

use crate::ast::{
    CompareOp, FromClause, Literal, Operand, OrderItem, ParamRef, Path, Predicate,
    SelectStatement,
};
use crate::error::{QueryError, Result};
use crate::lexer::{tokenize, unquote, Keyword, Lexeme, Token};

/// Deepest allowed stack of `NOT`s and parentheses in a predicate.
pub const MAX_NESTING: usize = 128;

/// Parse a complete `SELECT` statement.
pub fn parse(input: &str) -> Result<SelectStatement> {
    let mut parser = Parser::new(input)?;
    let statement = parser.select_statement()?;
    if let Some(lexeme) = parser.lexemes.get(parser.pos) {
        return Err(QueryError::syntax(
            lexeme.span.start,
            format!("unexpected trailing input {:?}", lexeme.token),
        ));
    }
    Ok(statement)
}

struct Parser<'src> {
    lexemes: Vec<Lexeme<'src>>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl<'src> Parser<'src> {
    fn new(input: &'src str) -> Result<Self> {
        Ok(Self {
            lexemes: tokenize(input)?,
            pos: 0,
            end: input.len(),
            depth: 0,
        })
    }

    // -----------------------------------------------------------------------
    // cursor helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<&Token<'src>> {
        self.lexemes.get(self.pos).map(|l| &l.token)
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().and_then(Token::keyword)
    }

    fn peek_keyword_at(&self, offset: usize) -> Option<Keyword> {
        self.lexemes
            .get(self.pos + offset)
            .and_then(|l| l.token.keyword())
    }

    /// Byte offset of the next lexeme, or the end of input.
    fn position(&self) -> usize {
        self.lexemes
            .get(self.pos)
            .map_or(self.end, |l| l.span.start)
    }

    fn advance(&mut self) -> Option<Lexeme<'src>> {
        let lexeme = self.lexemes.get(self.pos).cloned();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn eat(&mut self, token: &Token<'_>) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token<'_>, what: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek_keyword() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{keyword:?}").to_uppercase()))
        }
    }

    fn unexpected(&self, expected: &str) -> QueryError {
        match self.peek() {
            Some(token) => QueryError::syntax(
                self.position(),
                format!("expected {expected}, found {token:?}"),
            ),
            None => QueryError::syntax(self.end, format!("expected {expected}, found end of input")),
        }
    }

    /// A non-reserved word.
    fn identifier(&mut self, what: &str) -> Result<(String, usize)> {
        match self.peek() {
            Some(Token::Word(word)) if Keyword::from_word(word).is_none() => {
                let word = word.to_string();
                let position = self.position();
                self.pos += 1;
                Ok((word, position))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    // -----------------------------------------------------------------------
    // statement
    // -----------------------------------------------------------------------

    fn select_statement(&mut self) -> Result<SelectStatement> {
        self.expect_keyword(Keyword::Select)?;
        let distinct = self.eat_keyword(Keyword::Distinct);

        let mut items = vec![self.path()?];
        while self.eat(&Token::Comma) {
            items.push(self.path()?);
        }

        self.expect_keyword(Keyword::From)?;
        let (entity, _) = self.identifier("entity name")?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.identifier("alias")?.0)
        } else if matches!(self.peek(), Some(Token::Word(w)) if Keyword::from_word(w).is_none()) {
            Some(self.identifier("alias")?.0)
        } else {
            None
        };

        let filter = if self.eat_keyword(Keyword::Where) {
            Some(self.predicate()?)
        } else {
            None
        };

        let mut order_by = Vec::new();
        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            loop {
                let path = self.path()?;
                let descending = if self.eat_keyword(Keyword::Desc) {
                    true
                } else {
                    self.eat_keyword(Keyword::Asc);
                    false
                };
                order_by.push(OrderItem { path, descending });
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        Ok(SelectStatement {
            distinct,
            items,
            from: FromClause { entity, alias },
            filter,
            order_by,
        })
    }

    fn path(&mut self) -> Result<Path> {
        let (first, position) = self.identifier("identifier")?;
        let mut segments = vec![first];
        while self.eat(&Token::Dot) {
            match self.advance() {
                Some(Lexeme {
                    token: Token::Word(word),
                    ..
                }) => segments.push(word.to_string()),
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return Err(self.unexpected("field name after '.'"));
                }
            }
        }
        Ok(Path { segments, position })
    }

    // -----------------------------------------------------------------------
    // predicates
    // -----------------------------------------------------------------------

    fn predicate(&mut self) -> Result<Predicate> {
        let mut left = self.conjunction()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.conjunction()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Predicate> {
        let mut left = self.negation()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.negation()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn negation(&mut self) -> Result<Predicate> {
        if self.eat_keyword(Keyword::Not) {
            let inner = self.nested(Self::negation)?;
            return Ok(Predicate::Not(Box::new(inner)));
        }
        self.condition()
    }

    /// Run `parse_inner` one nesting level deeper.
    fn nested(&mut self, parse_inner: fn(&mut Self) -> Result<Predicate>) -> Result<Predicate> {
        if self.depth >= MAX_NESTING {
            return Err(QueryError::syntax(
                self.position(),
                format!("predicate nested deeper than {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        let result = parse_inner(self);
        self.depth -= 1;
        result
    }

    fn condition(&mut self) -> Result<Predicate> {
        if self.eat(&Token::LParen) {
            let inner = self.nested(Self::predicate)?;
            self.expect(&Token::RParen, "')'")?;
            return Ok(inner);
        }

        let operand = self.operand()?;

        if self.eat_keyword(Keyword::Is) {
            let negated = self.eat_keyword(Keyword::Not);
            self.expect_keyword(Keyword::Null)?;
            return Ok(Predicate::IsNull { operand, negated });
        }

        // `x NOT IN`, `x NOT LIKE`, `x NOT BETWEEN`
        let negated = self.peek_keyword() == Some(Keyword::Not)
            && matches!(
                self.peek_keyword_at(1),
                Some(Keyword::In | Keyword::Like | Keyword::Between)
            );
        if negated {
            self.pos += 1;
        }

        if self.eat_keyword(Keyword::In) {
            self.expect(&Token::LParen, "'(' after IN")?;
            let mut list = vec![self.operand()?];
            while self.eat(&Token::Comma) {
                list.push(self.operand()?);
            }
            self.expect(&Token::RParen, "')' closing IN list")?;
            return Ok(Predicate::In {
                operand,
                negated,
                list,
            });
        }

        if self.eat_keyword(Keyword::Like) {
            let pattern = self.operand()?;
            let escape = if self.eat_keyword(Keyword::Escape) {
                Some(self.operand()?)
            } else {
                None
            };
            return Ok(Predicate::Like {
                operand,
                negated,
                pattern,
                escape,
            });
        }

        if self.eat_keyword(Keyword::Between) {
            let low = self.operand()?;
            self.expect_keyword(Keyword::And)?;
            let high = self.operand()?;
            return Ok(Predicate::Between {
                operand,
                negated,
                low,
                high,
            });
        }

        let op = match self.peek() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::NotEq) => CompareOp::NotEq,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::LtEq) => CompareOp::LtEq,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::GtEq) => CompareOp::GtEq,
            _ => return Err(self.unexpected("comparison operator, IN, LIKE, BETWEEN or IS")),
        };
        self.pos += 1;
        let right = self.operand()?;
        Ok(Predicate::Compare {
            left: operand,
            op,
            right,
        })
    }

    fn operand(&mut self) -> Result<Operand> {
        let position = self.position();
        match self.peek().cloned() {
            Some(Token::Word(word)) => match Keyword::from_word(word) {
                Some(Keyword::Null) => {
                    self.pos += 1;
                    Ok(Operand::Literal(Literal::Null))
                }
                Some(_) => Err(self.unexpected("operand")),
                None => Ok(Operand::Path(self.path()?)),
            },
            Some(Token::Minus) => {
                self.pos += 1;
                match self.number(position)? {
                    Literal::Integer(v) => Ok(Operand::Literal(Literal::Integer(-v))),
                    Literal::Real(v) => Ok(Operand::Literal(Literal::Real(-v))),
                    _ => unreachable!("number() only yields numeric literals"),
                }
            }
            Some(Token::Integer(_) | Token::Decimal(_)) => {
                Ok(Operand::Literal(self.number(position)?))
            }
            Some(Token::Str(raw)) => {
                self.pos += 1;
                Ok(Operand::Literal(Literal::Text(unquote(raw))))
            }
            Some(Token::NamedParam(raw)) => {
                self.pos += 1;
                Ok(Operand::Param(ParamRef::Named(raw[1..].to_string())))
            }
            Some(Token::PositionalParam(raw)) => {
                self.pos += 1;
                let index = raw[1..].parse::<u32>().map_err(|_| {
                    QueryError::syntax(position, format!("invalid parameter position {raw}"))
                })?;
                if index == 0 {
                    return Err(QueryError::syntax(position, "parameter positions start at 1"));
                }
                Ok(Operand::Param(ParamRef::Positional(index)))
            }
            _ => Err(self.unexpected("operand")),
        }
    }

    fn number(&mut self, position: usize) -> Result<Literal> {
        match self.advance().map(|l| l.token) {
            Some(Token::Integer(raw)) => raw
                .parse::<i64>()
                .map(Literal::Integer)
                .map_err(|_| QueryError::syntax(position, format!("integer out of range: {raw}"))),
            Some(Token::Decimal(raw)) => raw
                .parse::<f64>()
                .map(Literal::Real)
                .map_err(|_| QueryError::syntax(position, format!("invalid number: {raw}"))),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.unexpected("number"))
            }
        }
    }
}
