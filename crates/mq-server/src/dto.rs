//! Presentation-side copies of the menu entities.
//!
//! Views never see [`mq_db::models`] types directly; handlers go through the
//! service, which maps entities into these DTOs. Field names serialize in
//! camelCase to match the names templates use.

use mq_db::models::{Category, Menu};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDto {
    pub menu_code: i64,
    pub menu_name: String,
    pub menu_price: i64,
    pub category_code: i64,
    pub orderable_status: String,
}

impl From<&Menu> for MenuDto {
    fn from(menu: &Menu) -> Self {
        Self {
            menu_code: menu.menu_code.get(),
            menu_name: menu.menu_name.clone(),
            menu_price: menu.menu_price,
            category_code: menu.category_code.get(),
            orderable_status: menu.orderable_status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_code: i64,
    pub category_name: String,
    pub ref_category_code: Option<i64>,
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        Self {
            category_code: category.category_code.get(),
            category_name: category.category_name.clone(),
            ref_category_code: category.ref_category_code.map(|c| c.get()),
        }
    }
}
