//! Translation of a parsed statement into parameterised SQL.
//!
//! The generated SQL always aliases the table as `t0`, so user-chosen
//! aliases never reach SQLite. Literals are bound as parameters rather than
//! spliced into the SQL text.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::ast::{Literal, Operand, ParamRef, Path, Predicate, SelectStatement};
use crate::error::{QueryError, Result};
use crate::metamodel::{EntityMeta, FieldMeta, FieldType, Metamodel};
use crate::value::Value;

const SQL_ALIAS: &str = "t0";

/// Shape of each result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The whole entity, columns in [`EntityMeta::fields`] order.
    Entity(&'static EntityMeta),
    /// One or more individual fields.
    Fields(Vec<&'static FieldMeta>),
}

impl Projection {
    pub fn describe(&self) -> String {
        match self {
            Projection::Entity(meta) => format!("entity {}", meta.name),
            Projection::Fields(fields) => {
                let names: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}:{:?}", f.name, f.field_type))
                    .collect();
                format!("fields ({})", names.join(", "))
            }
        }
    }

    /// The projected field, when exactly one is projected.
    pub fn single_field(&self) -> Option<&'static FieldMeta> {
        match self {
            Projection::Fields(fields) if fields.len() == 1 => Some(fields[0]),
            _ => None,
        }
    }

    pub fn single_field_type(&self) -> Option<FieldType> {
        self.single_field().map(|f| f.field_type)
    }
}

/// Where the value for one `?N` placeholder comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Literal(Value),
    Param(ParamRef),
}

/// A statement ready to execute.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sql: String,
    pub projection: Projection,
    /// One entry per placeholder, in placeholder order.
    pub bindings: Vec<Binding>,
}

impl CompiledQuery {
    /// Parameters the query expects, deduplicated.
    pub fn parameters(&self) -> BTreeSet<ParamRef> {
        self.bindings
            .iter()
            .filter_map(|b| match b {
                Binding::Param(p) => Some(p.clone()),
                Binding::Literal(_) => None,
            })
            .collect()
    }
}

/// Resolve names in `statement` against `metamodel` and emit SQL.
pub fn translate(metamodel: &Metamodel, statement: &SelectStatement) -> Result<CompiledQuery> {
    let entity = metamodel.entity(&statement.from.entity)?;
    let mut tx = Translator {
        entity,
        alias: statement.from.alias.as_deref(),
        sql: String::new(),
        bindings: Vec::new(),
    };

    let projection = tx.projection(&statement.items)?;

    tx.sql.push_str("SELECT ");
    if statement.distinct {
        tx.sql.push_str("DISTINCT ");
    }
    match &projection {
        Projection::Entity(meta) => tx.sql.push_str(&meta.column_list(Some(SQL_ALIAS))),
        Projection::Fields(fields) => {
            let columns: Vec<String> = fields
                .iter()
                .map(|f| format!("{SQL_ALIAS}.{}", f.column))
                .collect();
            tx.sql.push_str(&columns.join(", "));
        }
    }
    let _ = write!(tx.sql, " FROM {} {SQL_ALIAS}", entity.table);

    if let Some(filter) = &statement.filter {
        tx.sql.push_str(" WHERE ");
        tx.predicate(filter)?;
    }

    if !statement.order_by.is_empty() {
        tx.sql.push_str(" ORDER BY ");
        for (i, item) in statement.order_by.iter().enumerate() {
            if i > 0 {
                tx.sql.push_str(", ");
            }
            let field = tx.field(&item.path)?;
            let _ = write!(
                tx.sql,
                "{SQL_ALIAS}.{} {}",
                field.column,
                if item.descending { "DESC" } else { "ASC" }
            );
        }
    }

    Ok(CompiledQuery {
        sql: tx.sql,
        projection,
        bindings: tx.bindings,
    })
}

struct Translator<'a> {
    entity: &'static EntityMeta,
    alias: Option<&'a str>,
    sql: String,
    bindings: Vec<Binding>,
}

/// What a path in the query text refers to.
enum Resolved {
    Entity,
    Field(&'static FieldMeta),
}

impl Translator<'_> {
    fn resolve(&self, path: &Path) -> Result<Resolved> {
        match path.segments.as_slice() {
            [single] if Some(single.as_str()) == self.alias => Ok(Resolved::Entity),
            [single] => self.entity.resolve_field(single).map(Resolved::Field),
            [qualifier, field] => {
                if Some(qualifier.as_str()) != self.alias {
                    return Err(QueryError::UnknownAlias(qualifier.clone()));
                }
                self.entity.resolve_field(field).map(Resolved::Field)
            }
            _ => Err(QueryError::Unsupported(format!(
                "path navigation '{}' (associations are not mapped)",
                path.dotted()
            ))),
        }
    }

    fn field(&self, path: &Path) -> Result<&'static FieldMeta> {
        match self.resolve(path)? {
            Resolved::Field(field) => Ok(field),
            Resolved::Entity => Err(QueryError::Unsupported(format!(
                "entity reference '{}' where a field is required",
                path.dotted()
            ))),
        }
    }

    fn projection(&self, items: &[Path]) -> Result<Projection> {
        let mut fields = Vec::with_capacity(items.len());
        for item in items {
            match self.resolve(item)? {
                Resolved::Entity if items.len() == 1 => {
                    return Ok(Projection::Entity(self.entity))
                }
                Resolved::Entity => {
                    return Err(QueryError::Unsupported(
                        "an entity selection must be the only select item".into(),
                    ))
                }
                Resolved::Field(field) => fields.push(field),
            }
        }
        Ok(Projection::Fields(fields))
    }

    fn placeholder(&mut self, binding: Binding) {
        self.bindings.push(binding);
        let _ = write!(self.sql, "?{}", self.bindings.len());
    }

    fn operand(&mut self, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Path(path) => {
                let field = self.field(path)?;
                let _ = write!(self.sql, "{SQL_ALIAS}.{}", field.column);
            }
            Operand::Literal(Literal::Null) => self.sql.push_str("NULL"),
            Operand::Literal(Literal::Integer(v)) => {
                self.placeholder(Binding::Literal(Value::Integer(*v)))
            }
            Operand::Literal(Literal::Real(v)) => {
                self.placeholder(Binding::Literal(Value::Real(*v)))
            }
            Operand::Literal(Literal::Text(s)) => {
                self.placeholder(Binding::Literal(Value::Text(s.clone())))
            }
            Operand::Param(param) => self.placeholder(Binding::Param(param.clone())),
        }
        Ok(())
    }

    fn predicate(&mut self, predicate: &Predicate) -> Result<()> {
        match predicate {
            Predicate::And(left, right) => self.binary(left, "AND", right),
            Predicate::Or(left, right) => self.binary(left, "OR", right),
            Predicate::Not(inner) => {
                self.sql.push_str("NOT (");
                self.predicate(inner)?;
                self.sql.push(')');
                Ok(())
            }
            Predicate::Compare { left, op, right } => {
                self.operand(left)?;
                let _ = write!(self.sql, " {} ", op.as_sql());
                self.operand(right)
            }
            Predicate::In {
                operand,
                negated,
                list,
            } => {
                self.operand(operand)?;
                self.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.operand(item)?;
                }
                self.sql.push(')');
                Ok(())
            }
            Predicate::Like {
                operand,
                negated,
                pattern,
                escape,
            } => {
                self.operand(operand)?;
                self.sql.push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                self.operand(pattern)?;
                if let Some(escape) = escape {
                    self.sql.push_str(" ESCAPE ");
                    self.operand(escape)?;
                }
                Ok(())
            }
            Predicate::Between {
                operand,
                negated,
                low,
                high,
            } => {
                self.operand(operand)?;
                self.sql
                    .push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.operand(low)?;
                self.sql.push_str(" AND ");
                self.operand(high)
            }
            Predicate::IsNull { operand, negated } => {
                self.operand(operand)?;
                self.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
                Ok(())
            }
        }
    }

    fn binary(&mut self, left: &Predicate, op: &str, right: &Predicate) -> Result<()> {
        self.sql.push('(');
        self.predicate(left)?;
        let _ = write!(self.sql, " {op} ");
        self.predicate(right)?;
        self.sql.push(')');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::fixtures::metamodel;
    use crate::parser::parse;

    fn compile(oql: &str) -> Result<CompiledQuery> {
        translate(&metamodel(), &parse(oql)?)
    }

    #[test]
    fn scalar_projection_with_literal_binding() {
        let q = compile("SELECT d.dishName FROM Dish d WHERE d.dishCode = 7").unwrap();
        assert_eq!(
            q.sql,
            "SELECT t0.dish_name FROM dishes t0 WHERE t0.dish_code = ?1"
        );
        assert_eq!(q.bindings, vec![Binding::Literal(Value::Integer(7))]);
        assert_eq!(q.projection.single_field_type(), Some(FieldType::Text));
    }

    #[test]
    fn bare_fields_resolve_without_alias() {
        let q = compile("SELECT dishName FROM Dish WHERE dishCode = 7").unwrap();
        assert_eq!(
            q.sql,
            "SELECT t0.dish_name FROM dishes t0 WHERE t0.dish_code = ?1"
        );
    }

    #[test]
    fn entity_projection_lists_all_columns() {
        let q = compile("SELECT d FROM Dish d").unwrap();
        assert_eq!(
            q.sql,
            "SELECT t0.dish_code, t0.dish_name, t0.price, t0.category_code FROM dishes t0"
        );
        assert!(matches!(q.projection, Projection::Entity(meta) if meta.name == "Dish"));
    }

    #[test]
    fn distinct_in_like_and_order() {
        let q = compile(
            "SELECT DISTINCT d.categoryCode FROM Dish d \
             WHERE d.categoryCode IN (4, 5) OR d.dishName LIKE '%마늘%' ORDER BY d.categoryCode DESC",
        )
        .unwrap();
        assert_eq!(
            q.sql,
            "SELECT DISTINCT t0.category_code FROM dishes t0 \
             WHERE (t0.category_code IN (?1, ?2) OR t0.dish_name LIKE ?3) \
             ORDER BY t0.category_code DESC"
        );
        assert_eq!(q.bindings.len(), 3);
    }

    #[test]
    fn parameters_are_collected() {
        let q = compile("SELECT d FROM Dish d WHERE d.price BETWEEN ?1 AND ?2 AND d.dishName <> :name")
            .unwrap();
        let params: Vec<String> = q.parameters().iter().map(ToString::to_string).collect();
        assert_eq!(params, vec!["?1", "?2", ":name"]);
    }

    #[test]
    fn null_literal_is_inlined() {
        let q = compile("SELECT d FROM Dish d WHERE d.categoryCode IS NULL OR d.categoryCode = NULL")
            .unwrap();
        assert!(q.sql.ends_with("(t0.category_code IS NULL OR t0.category_code = NULL)"));
        assert!(q.bindings.is_empty());
    }

    #[test]
    fn negated_forms() {
        let where_clause = |oql: &str| {
            let q = compile(oql).unwrap();
            let at = q.sql.find(" WHERE ").unwrap();
            q.sql[at + 7..].to_string()
        };

        assert_eq!(
            where_clause("SELECT d FROM Dish d WHERE d.categoryCode NOT IN (4, 5)"),
            "t0.category_code NOT IN (?1, ?2)"
        );
        assert_eq!(
            where_clause(r"SELECT d FROM Dish d WHERE d.dishName NOT LIKE '%\_%' ESCAPE '\'"),
            "t0.dish_name NOT LIKE ?1 ESCAPE ?2"
        );
        assert_eq!(
            where_clause("SELECT d FROM Dish d WHERE d.price NOT BETWEEN 1 AND 5000"),
            "t0.price NOT BETWEEN ?1 AND ?2"
        );
        assert_eq!(
            where_clause("SELECT d FROM Dish d WHERE d.categoryCode IS NOT NULL"),
            "t0.category_code IS NOT NULL"
        );
        assert_eq!(
            where_clause("SELECT d FROM Dish d WHERE NOT (d.price > 100 AND NOT d.dishCode = 1)"),
            "NOT ((t0.price > ?1 AND NOT (t0.dish_code = ?2)))"
        );
    }

    #[test]
    fn unknown_entity() {
        assert!(matches!(
            compile("SELECT m FROM Menu m"),
            Err(QueryError::UnknownEntity(name)) if name == "Menu"
        ));
    }

    #[test]
    fn unknown_field() {
        assert!(matches!(
            compile("SELECT d.menuName FROM Dish d"),
            Err(QueryError::UnknownField { .. })
        ));
    }

    #[test]
    fn wrong_qualifier() {
        assert!(matches!(
            compile("SELECT x.dishName FROM Dish d"),
            Err(QueryError::UnknownAlias(alias)) if alias == "x"
        ));
    }

    #[test]
    fn entity_mixed_with_fields_is_unsupported() {
        assert!(matches!(
            compile("SELECT d, d.dishName FROM Dish d"),
            Err(QueryError::Unsupported(_))
        ));
    }

    #[test]
    fn association_navigation_is_unsupported() {
        assert!(matches!(
            compile("SELECT d.category.name FROM Dish d"),
            Err(QueryError::Unsupported(_))
        ));
    }
}
