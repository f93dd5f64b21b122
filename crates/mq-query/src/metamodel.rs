//! Entity metadata: how entity and field names map onto tables and columns.
//!
//! Entities describe themselves through the [`Entity`] trait and are
//! registered with a [`Metamodel`], which the translator consults to resolve
//! names written in query text.

use std::collections::HashMap;

use crate::error::{QueryError, Result};
use crate::value::Value;

/// Storage class of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Real,
    Text,
}

/// One mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// Name used in query text (e.g. `menuName`).
    pub name: &'static str,
    /// Backing column (e.g. `menu_name`).
    pub column: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
}

/// Mapping of one entity onto one table.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityMeta {
    /// Name used in `FROM` clauses.
    pub name: &'static str,
    pub table: &'static str,
    /// Field holding the primary key.
    pub id_field: &'static str,
    /// Fields in column order; [`Entity::from_row`] and [`Entity::values`]
    /// follow this order.
    pub fields: &'static [FieldMeta],
}

impl EntityMeta {
    pub fn field(&self, name: &str) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn resolve_field(&self, name: &str) -> Result<&'static FieldMeta> {
        self.field(name).ok_or_else(|| QueryError::UnknownField {
            entity: self.name.to_string(),
            field: name.to_string(),
        })
    }

    pub fn id(&self) -> Result<&'static FieldMeta> {
        self.resolve_field(self.id_field)
    }

    /// Comma-separated column list, each prefixed with `qualifier.` when given.
    pub fn column_list(&self, qualifier: Option<&str>) -> String {
        self.fields
            .iter()
            .map(|f| match qualifier {
                Some(q) => format!("{q}.{}", f.column),
                None => f.column.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A type persisted through the object-query layer.
pub trait Entity: Sized {
    fn meta() -> &'static EntityMeta;

    /// Build the entity from a row whose columns follow [`EntityMeta::fields`].
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;

    /// Field values in [`EntityMeta::fields`] order.
    fn values(&self) -> Vec<Value>;
}

/// Registry of known entities, keyed by entity name.
#[derive(Debug, Default)]
pub struct Metamodel {
    entities: HashMap<&'static str, &'static EntityMeta>,
}

impl Metamodel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type. Re-registering the same name replaces it.
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        let meta = E::meta();
        debug_assert!(
            meta.field(meta.id_field).is_some(),
            "id field {} missing from entity {}",
            meta.id_field,
            meta.name
        );
        self.entities.insert(meta.name, meta);
        self
    }

    pub fn entity(&self, name: &str) -> Result<&'static EntityMeta> {
        self.entities
            .get(name)
            .copied()
            .ok_or_else(|| QueryError::UnknownEntity(name.to_string()))
    }

    /// Registered entity names, sorted.
    pub fn entity_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entities.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small entity used by the query crate's own tests.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Dish {
        pub code: i64,
        pub name: String,
        pub price: i64,
        pub category: Option<i64>,
    }

    static DISH_FIELDS: [FieldMeta; 4] = [
        FieldMeta {
            name: "dishCode",
            column: "dish_code",
            field_type: FieldType::Integer,
            nullable: false,
        },
        FieldMeta {
            name: "dishName",
            column: "dish_name",
            field_type: FieldType::Text,
            nullable: false,
        },
        FieldMeta {
            name: "price",
            column: "price",
            field_type: FieldType::Integer,
            nullable: false,
        },
        FieldMeta {
            name: "categoryCode",
            column: "category_code",
            field_type: FieldType::Integer,
            nullable: true,
        },
    ];

    static DISH_META: EntityMeta = EntityMeta {
        name: "Dish",
        table: "dishes",
        id_field: "dishCode",
        fields: &DISH_FIELDS,
    };

    impl Entity for Dish {
        fn meta() -> &'static EntityMeta {
            &DISH_META
        }

        fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
            Ok(Self {
                code: row.get(0)?,
                name: row.get(1)?,
                price: row.get(2)?,
                category: row.get(3)?,
            })
        }

        fn values(&self) -> Vec<Value> {
            vec![
                self.code.into(),
                self.name.clone().into(),
                self.price.into(),
                self.category.into(),
            ]
        }
    }

    pub fn metamodel() -> Metamodel {
        let mut mm = Metamodel::new();
        mm.register::<Dish>();
        mm
    }

    /// In-memory connection with a handful of dishes.
    pub fn connection() -> rusqlite::Connection {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE dishes (
                 dish_code     INTEGER PRIMARY KEY,
                 dish_name     TEXT NOT NULL,
                 price         INTEGER NOT NULL,
                 category_code INTEGER
             );
             INSERT INTO dishes VALUES (1, '김치찌개', 8000, 4);
             INSERT INTO dishes VALUES (2, '마늘빵', 3000, 5);
             INSERT INTO dishes VALUES (3, '흑마늘라떼', 5500, 8);
             INSERT INTO dishes VALUES (4, '된장찌개', 8000, 4);
             INSERT INTO dishes VALUES (5, '물', 0, NULL);",
        )
        .unwrap();
        conn
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{metamodel, Dish};
    use super::*;

    #[test]
    fn lookup_registered_entity() {
        let mm = metamodel();
        let meta = mm.entity("Dish").unwrap();
        assert_eq!(meta.table, "dishes");
        assert_eq!(meta.id().unwrap().column, "dish_code");
        assert_eq!(mm.entity_names(), vec!["Dish"]);
    }

    #[test]
    fn entity_names_are_case_sensitive() {
        let mm = metamodel();
        assert!(matches!(mm.entity("dish"), Err(QueryError::UnknownEntity(_))));
    }

    #[test]
    fn unknown_field() {
        let err = Dish::meta().resolve_field("dish_name").unwrap_err();
        assert_eq!(err.to_string(), "Unknown field 'dish_name' on entity Dish");
    }

    #[test]
    fn qualified_column_list() {
        assert_eq!(
            Dish::meta().column_list(Some("t0")),
            "t0.dish_code, t0.dish_name, t0.price, t0.category_code"
        );
    }
}
