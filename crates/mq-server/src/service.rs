//! Menu service: repository lookups mapped into DTOs.

use mq_core::{Error, MenuCode, Result};
use mq_db::queries::{categories, menus};
use mq_db::SessionFactory;

use crate::dto::{CategoryDto, MenuDto};

/// Read-side menu operations. Each call runs in its own session.
pub struct MenuService<'a> {
    sessions: &'a SessionFactory,
}

impl<'a> MenuService<'a> {
    pub fn new(sessions: &'a SessionFactory) -> Self {
        Self { sessions }
    }

    /// Look up one menu.
    ///
    /// A code with no matching row is the caller's mistake and is reported
    /// as [`Error::IllegalArgument`].
    pub fn find_menu_by_code(&self, code: MenuCode) -> Result<MenuDto> {
        let session = self.sessions.open_session()?;
        let menu = menus::find_menu_by_code(&session, code)?
            .ok_or_else(|| Error::IllegalArgument(format!("no menu with code {code}")))?;
        Ok(MenuDto::from(&menu))
    }

    /// Every menu, ordered by code.
    pub fn find_menu_list(&self) -> Result<Vec<MenuDto>> {
        let session = self.sessions.open_session()?;
        let list = menus::list_menus(&session)?;
        Ok(list.iter().map(MenuDto::from).collect())
    }

    pub fn find_all_categories(&self) -> Result<Vec<CategoryDto>> {
        let session = self.sessions.open_session()?;
        let list = categories::list_categories(&session)?;
        Ok(list.iter().map(CategoryDto::from).collect())
    }
}
