//! Menu pages.

use axum::extract::{Path, State};
use axum::response::Html;
use mq_core::MenuCode;
use serde_json::json;

use crate::context::AppContext;
use crate::error::AppError;
use crate::service::MenuService;

/// GET /menu/{menuCode}
pub async fn menu_detail(
    State(ctx): State<AppContext>,
    Path(menu_code): Path<i64>,
) -> Result<Html<String>, AppError> {
    tracing::info!(menu_code, "menu detail requested");

    let menu = MenuService::new(&ctx.sessions).find_menu_by_code(MenuCode::new(menu_code))?;
    let html = ctx.views.render("menu/detail", &json!({ "menu": menu }))?;
    Ok(Html(html))
}

/// GET /menu/list
pub async fn menu_list(State(ctx): State<AppContext>) -> Result<Html<String>, AppError> {
    let service = MenuService::new(&ctx.sessions);
    let menu_list = service.find_menu_list()?;
    let category_list = service.find_all_categories()?;
    tracing::debug!(count = menu_list.len(), "menu list loaded");

    let html = ctx.views.render(
        "menu/list",
        &json!({ "menuList": menu_list, "categoryList": category_list }),
    )?;
    Ok(Html(html))
}
