//! Menu lookups and inserts.

use mq_core::{CategoryCode, Error, MenuCode, Result};
use mq_query::{QueryError, Value};

use crate::models::Menu;
use crate::session::Session;

/// Load a menu by its code.
pub fn find_menu_by_code(session: &Session, code: MenuCode) -> Result<Option<Menu>> {
    session.find(code)
}

/// Fetch only the name of one menu.
pub fn find_menu_name(session: &Session, code: MenuCode) -> Result<Option<String>> {
    let result = session
        .create_typed_query::<String>(
            "SELECT m.menuName FROM Menu m WHERE m.menuCode = :menuCode",
        )?
        .set_parameter("menuCode", code)
        .single_result();
    match result {
        Ok(name) => Ok(Some(name)),
        Err(QueryError::NoResult) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every menu, ordered by code.
pub fn list_menus(session: &Session) -> Result<Vec<Menu>> {
    Ok(session
        .create_typed_query::<Menu>("SELECT m FROM Menu m ORDER BY m.menuCode ASC")?
        .result_list()?)
}

/// Menus belonging to any of `codes`, ordered by code.
pub fn list_menus_by_category_codes(
    session: &Session,
    codes: &[CategoryCode],
) -> Result<Vec<Menu>> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=codes.len()).map(|i| format!("?{i}")).collect();
    let oql = format!(
        "SELECT m FROM Menu m WHERE m.categoryCode IN ({}) ORDER BY m.menuCode",
        placeholders.join(", ")
    );

    let mut query = session.create_typed_query::<Menu>(&oql)?;
    for (position, code) in (1u32..).zip(codes) {
        query = query.set_position(position, *code);
    }
    Ok(query.result_list()?)
}

/// Menus whose name contains `fragment`, ordered by code.
///
/// `%` and `_` in the fragment match literally.
pub fn search_menus_by_name(session: &Session, fragment: &str) -> Result<Vec<Menu>> {
    let pattern = format!("%{}%", escape_like(fragment));
    Ok(session
        .create_typed_query::<Menu>(
            r"SELECT m FROM Menu m WHERE m.menuName LIKE :pattern ESCAPE '\' ORDER BY m.menuCode",
        )?
        .set_parameter("pattern", pattern)
        .result_list()?)
}

/// The distinct category codes that have at least one menu, ascending.
pub fn list_distinct_category_codes(session: &Session) -> Result<Vec<CategoryCode>> {
    let codes = session
        .create_typed_query::<i64>(
            "SELECT DISTINCT m.categoryCode FROM Menu m ORDER BY m.categoryCode",
        )?
        .result_list()?;
    Ok(codes.into_iter().map(CategoryCode::new).collect())
}

/// Menus that can currently be ordered, cheapest first.
pub fn list_orderable_menus(session: &Session) -> Result<Vec<Menu>> {
    Ok(session
        .create_typed_query::<Menu>(
            "SELECT m FROM Menu m WHERE m.orderableStatus = 'Y' \
             ORDER BY m.menuPrice, m.menuCode",
        )?
        .result_list()?)
}

/// Menus priced within `[low, high]`, ordered by price.
pub fn list_menus_in_price_range(session: &Session, low: i64, high: i64) -> Result<Vec<Menu>> {
    if low > high {
        return Err(Error::IllegalArgument(format!(
            "price range {low}..{high} is empty"
        )));
    }
    Ok(session
        .create_typed_query::<Menu>(
            "SELECT m FROM Menu m WHERE m.menuPrice BETWEEN :low AND :high \
             ORDER BY m.menuPrice, m.menuCode",
        )?
        .set_parameter("low", low)
        .set_parameter("high", high)
        .result_list()?)
}

/// Code and name of every menu as untyped rows.
pub fn list_menu_summaries(session: &Session) -> Result<Vec<(MenuCode, String)>> {
    let rows = session
        .create_query("SELECT m.menuCode, m.menuName FROM Menu m ORDER BY m.menuCode")?
        .result_list()?;

    rows.into_iter()
        .map(|row| match row {
            Value::Tuple(values) => match (values.first(), values.get(1)) {
                (Some(Value::Integer(code)), Some(Value::Text(name))) => {
                    Ok((MenuCode::new(*code), name.clone()))
                }
                _ => Err(Error::Internal(format!("malformed summary row: {values:?}"))),
            },
            other => Err(Error::Internal(format!("expected a tuple row, got {other}"))),
        })
        .collect()
}

/// Insert a new menu.
pub fn create_menu(session: &Session, menu: &Menu) -> Result<()> {
    session.persist(menu)?;
    tracing::debug!(menu_code = %menu.menu_code, "created menu");
    Ok(())
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
