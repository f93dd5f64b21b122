//! Syntax tree produced by the parser.
//!
//! Names are kept exactly as written; resolving them against the
//! metamodel is the translator's job.

/// `SELECT ... FROM ... [WHERE ...] [ORDER BY ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub distinct: bool,
    pub items: Vec<Path>,
    pub from: FromClause,
    pub filter: Option<Predicate>,
    pub order_by: Vec<OrderItem>,
}

/// The single entity a query ranges over.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub entity: String,
    pub alias: Option<String>,
}

/// A dotted name such as `m`, `menuName`, or `m.menuName`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<String>,
    /// Byte offset of the first segment, for error messages.
    pub position: usize,
}

impl Path {
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamRef {
    Named(String),
    Positional(u32),
}

impl PartialOrd for ParamRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (ParamRef::Positional(a), ParamRef::Positional(b)) => a.cmp(b),
            (ParamRef::Named(a), ParamRef::Named(b)) => a.cmp(b),
            (ParamRef::Positional(_), ParamRef::Named(_)) => Ordering::Less,
            (ParamRef::Named(_), ParamRef::Positional(_)) => Ordering::Greater,
        }
    }
}

impl std::fmt::Display for ParamRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamRef::Named(name) => write!(f, ":{name}"),
            ParamRef::Positional(index) => write!(f, "?{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Path(Path),
    Literal(Literal),
    Param(ParamRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

/// Boolean conditions allowed in `WHERE`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
    In {
        operand: Operand,
        negated: bool,
        list: Vec<Operand>,
    },
    Like {
        operand: Operand,
        negated: bool,
        pattern: Operand,
        escape: Option<Operand>,
    },
    Between {
        operand: Operand,
        negated: bool,
        low: Operand,
        high: Operand,
    },
    IsNull {
        operand: Operand,
        negated: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub path: Path,
    pub descending: bool,
}
