//! Category lookups.

use mq_core::{CategoryCode, Result};

use crate::models::Category;
use crate::session::Session;

/// Every category, ordered by code.
pub fn list_categories(session: &Session) -> Result<Vec<Category>> {
    Ok(session
        .create_typed_query::<Category>("SELECT c FROM Category c ORDER BY c.categoryCode")?
        .result_list()?)
}

/// Load a category by its code.
pub fn find_category_by_code(session: &Session, code: CategoryCode) -> Result<Option<Category>> {
    session.find(code)
}

/// Top-level categories (no parent).
pub fn list_root_categories(session: &Session) -> Result<Vec<Category>> {
    Ok(session
        .create_typed_query::<Category>(
            "SELECT c FROM Category c WHERE c.refCategoryCode IS NULL ORDER BY c.categoryCode",
        )?
        .result_list()?)
}

/// Direct children of `parent`.
pub fn list_child_categories(session: &Session, parent: CategoryCode) -> Result<Vec<Category>> {
    Ok(session
        .create_typed_query::<Category>(
            "SELECT c FROM Category c WHERE c.refCategoryCode = :parent ORDER BY c.categoryCode",
        )?
        .set_parameter("parent", parent)
        .result_list()?)
}

pub fn create_category(session: &Session, category: &Category) -> Result<()> {
    session.persist(category)
}
