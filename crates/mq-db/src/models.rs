//! Entities mapped onto the menu database tables.
//!
//! Each model implements [`Entity`], which gives the object-query layer its
//! entity name, table, field-to-column mapping, and row conversion.

use mq_core::{CategoryCode, MenuCode};
use mq_query::{Entity, EntityMeta, FieldMeta, FieldType, Value};

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub menu_code: MenuCode,
    pub menu_name: String,
    pub menu_price: i64,
    pub category_code: CategoryCode,
    /// `"Y"` when the menu can currently be ordered, `"N"` otherwise.
    pub orderable_status: String,
}

static MENU_FIELDS: [FieldMeta; 5] = [
    FieldMeta {
        name: "menuCode",
        column: "menu_code",
        field_type: FieldType::Integer,
        nullable: false,
    },
    FieldMeta {
        name: "menuName",
        column: "menu_name",
        field_type: FieldType::Text,
        nullable: false,
    },
    FieldMeta {
        name: "menuPrice",
        column: "menu_price",
        field_type: FieldType::Integer,
        nullable: false,
    },
    FieldMeta {
        name: "categoryCode",
        column: "category_code",
        field_type: FieldType::Integer,
        nullable: false,
    },
    FieldMeta {
        name: "orderableStatus",
        column: "orderable_status",
        field_type: FieldType::Text,
        nullable: false,
    },
];

static MENU_META: EntityMeta = EntityMeta {
    name: "Menu",
    table: "tbl_menu",
    id_field: "menuCode",
    fields: &MENU_FIELDS,
};

impl Menu {
    pub fn is_orderable(&self) -> bool {
        self.orderable_status == "Y"
    }
}

impl Entity for Menu {
    fn meta() -> &'static EntityMeta {
        &MENU_META
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            menu_code: MenuCode::new(row.get(0)?),
            menu_name: row.get(1)?,
            menu_price: row.get(2)?,
            category_code: CategoryCode::new(row.get(3)?),
            orderable_status: row.get(4)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.menu_code.into(),
            self.menu_name.clone().into(),
            self.menu_price.into(),
            self.category_code.into(),
            self.orderable_status.clone().into(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_code: CategoryCode,
    pub category_name: String,
    /// Parent category; `None` for top-level categories.
    pub ref_category_code: Option<CategoryCode>,
}

static CATEGORY_FIELDS: [FieldMeta; 3] = [
    FieldMeta {
        name: "categoryCode",
        column: "category_code",
        field_type: FieldType::Integer,
        nullable: false,
    },
    FieldMeta {
        name: "categoryName",
        column: "category_name",
        field_type: FieldType::Text,
        nullable: false,
    },
    FieldMeta {
        name: "refCategoryCode",
        column: "ref_category_code",
        field_type: FieldType::Integer,
        nullable: true,
    },
];

static CATEGORY_META: EntityMeta = EntityMeta {
    name: "Category",
    table: "tbl_category",
    id_field: "categoryCode",
    fields: &CATEGORY_FIELDS,
};

impl Entity for Category {
    fn meta() -> &'static EntityMeta {
        &CATEGORY_META
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let parent: Option<i64> = row.get(2)?;
        Ok(Self {
            category_code: CategoryCode::new(row.get(0)?),
            category_name: row.get(1)?,
            ref_category_code: parent.map(CategoryCode::new),
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.category_code.into(),
            self.category_name.clone().into(),
            self.ref_category_code.into(),
        ]
    }
}
