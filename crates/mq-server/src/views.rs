//! Handlebars view registry.
//!
//! Templates are compiled into the binary and registered once at startup
//! under their view names (`menu/detail`, `menu/list`, `error`).

use handlebars::Handlebars;
use mq_core::{Error, Result};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("menu/detail", include_str!("../templates/menu/detail.hbs")),
    ("menu/list", include_str!("../templates/menu/list.hbs")),
    ("error", include_str!("../templates/error.hbs")),
];

/// Compiled templates, shared read-only across handlers.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        for &(name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| Error::render(name, e.to_string()))?;
        }
        tracing::debug!(count = TEMPLATES.len(), "registered view templates");
        Ok(Self { registry })
    }

    /// Render `view` with `data` as its context.
    pub fn render<T: Serialize>(&self, view: &str, data: &T) -> Result<String> {
        self.registry
            .render(view, data)
            .map_err(|e| Error::render(view, e.to_string()))
    }

    pub fn has_view(&self, view: &str) -> bool {
        self.registry.has_template(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorPage;
    use serde_json::json;

    #[test]
    fn all_views_register() {
        let views = Views::new().unwrap();
        for view in ["menu/detail", "menu/list", "error"] {
            assert!(views.has_view(view), "{view} missing");
        }
    }

    #[test]
    fn detail_renders_menu_fields() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "menu/detail",
                &json!({"menu": {
                    "menuCode": 7,
                    "menuName": "민트미역국",
                    "menuPrice": 15000,
                    "categoryCode": 4,
                    "orderableStatus": "Y"
                }}),
            )
            .unwrap();
        assert!(html.contains("<title>민트미역국</title>"));
        assert!(html.contains(r#"<td class="menu-price">15000</td>"#));
    }

    #[test]
    fn list_renders_empty_state() {
        let views = Views::new().unwrap();
        let html = views
            .render("menu/list", &json!({"menuList": [], "categoryList": []}))
            .unwrap();
        assert!(html.contains("등록된 메뉴가 없습니다."));
    }

    #[test]
    fn output_is_escaped() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "menu/list",
                &json!({"menuList": [{
                    "menuCode": 1,
                    "menuName": "<script>",
                    "menuPrice": 0,
                    "categoryCode": 4,
                    "orderableStatus": "N"
                }], "categoryList": []}),
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_page_escapes_message() {
        let views = Views::new().unwrap();
        let page = ErrorPage {
            status: 400,
            reason: "Bad Request",
            code: "illegal_argument",
            message: "Illegal argument: <b>9999</b>".into(),
        };
        let html = views.render("error", &page).unwrap();
        assert!(html.contains("<title>Bad Request</title>"));
        assert!(html.contains("<h1>400 Bad Request</h1>"));
        assert!(html.contains(r#"<p class="error-code">illegal_argument</p>"#));
        assert!(html.contains("&lt;b&gt;9999&lt;/b&gt;"));
    }

    #[test]
    fn missing_context_is_a_render_error() {
        let views = Views::new().unwrap();
        let err = views.render("menu/detail", &json!({})).unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }
}
