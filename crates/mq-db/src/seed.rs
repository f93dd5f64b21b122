//! Fixture data for a fresh database.
//!
//! The fixture set is the reference menu the query tests and the web views
//! are written against: twelve categories in a two-level tree and
//! twenty-one menus spread over them.

use mq_core::{CategoryCode, Error, MenuCode, Result};

use crate::models::{Category, Menu};
use crate::session::Session;

const CATEGORIES: &[(i64, &str, Option<i64>)] = &[
    (1, "식사", None),
    (2, "음료", None),
    (3, "디저트", None),
    (4, "한식", Some(1)),
    (5, "중식", Some(1)),
    (6, "일식", Some(1)),
    (7, "퓨전", Some(1)),
    (8, "커피", Some(2)),
    (9, "쥬스", Some(2)),
    (10, "기타", Some(2)),
    (11, "동양", Some(3)),
    (12, "서양", Some(3)),
];

const MENUS: &[(i64, &str, i64, i64, &str)] = &[
    (1, "열무김치라떼", 4500, 8, "Y"),
    (2, "우럭스무디", 5000, 10, "Y"),
    (3, "생갈치쉐이크", 6000, 10, "Y"),
    (4, "갈릭미역파르페", 7000, 10, "Y"),
    (5, "앙버터김치찜", 13000, 4, "N"),
    (6, "생마늘샐러드", 12000, 4, "Y"),
    (7, "민트미역국", 15000, 4, "Y"),
    (8, "한우딸기국밥", 20000, 4, "Y"),
    (9, "홍어마카롱", 9000, 6, "Y"),
    (10, "코다리마늘빵", 7000, 5, "N"),
    (11, "정어리빙수", 10000, 10, "Y"),
    (12, "날치알스크류바", 2000, 10, "Y"),
    (13, "직화구이젤라또", 8000, 12, "Y"),
    (14, "과메기커틀릿", 13000, 6, "Y"),
    (15, "죽방멸치빙수", 11000, 12, "N"),
    (16, "흑마늘아메리카노", 9000, 8, "Y"),
    (17, "아이스가리비관자육수", 6000, 10, "Y"),
    (18, "돌미나리백설기", 5000, 12, "Y"),
    (19, "까나리코다리찜", 8000, 4, "Y"),
    (20, "청국장라떼", 6500, 8, "N"),
    (21, "마늘떡볶이", 8500, 7, "Y"),
];

/// Insert the fixture categories and menus unless menus already exist.
///
/// Categories already present under a fixture code are kept as they are, so
/// a database holding only categories still gets its menus. Returns the
/// number of menus inserted; zero when the database was already populated.
/// All rows go in under one transaction.
pub fn seed_fixtures(session: &Session) -> Result<usize> {
    let existing = session
        .create_typed_query::<i64>("SELECT m.menuCode FROM Menu m")?
        .result_list()?
        .len();
    if existing > 0 {
        tracing::debug!(existing, "menu table already populated, skipping fixtures");
        return Ok(0);
    }

    let tx = session
        .connection()
        .unchecked_transaction()
        .map_err(Error::database)?;

    let mut categories = 0;
    for &(code, name, parent) in CATEGORIES {
        let category_code = CategoryCode::new(code);
        if session.find::<Category>(category_code)?.is_some() {
            continue;
        }
        session.persist(&Category {
            category_code,
            category_name: name.to_string(),
            ref_category_code: parent.map(CategoryCode::new),
        })?;
        categories += 1;
    }

    for &(code, name, price, category, status) in MENUS {
        session.persist(&Menu {
            menu_code: MenuCode::new(code),
            menu_name: name.to_string(),
            menu_price: price,
            category_code: CategoryCode::new(category),
            orderable_status: status.to_string(),
        })?;
    }

    tx.commit().map_err(Error::database)?;
    tracing::info!(
        categories,
        menus = MENUS.len(),
        "seeded fixture data"
    );
    Ok(MENUS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::session::SessionFactory;

    #[test]
    fn seeds_once() {
        let factory = SessionFactory::new(init_memory_pool().unwrap());
        let session = factory.open_session().unwrap();

        assert_eq!(seed_fixtures(&session).unwrap(), 21);
        assert_eq!(seed_fixtures(&session).unwrap(), 0);

        let menus: Vec<Menu> = session
            .create_typed_query("SELECT m FROM Menu m")
            .unwrap()
            .result_list()
            .unwrap();
        assert_eq!(menus.len(), 21);
    }

    #[test]
    fn seeds_menus_over_existing_categories() {
        let factory = SessionFactory::new(init_memory_pool().unwrap());
        let session = factory.open_session().unwrap();
        session
            .persist(&Category {
                category_code: CategoryCode::new(1),
                category_name: "식사".into(),
                ref_category_code: None,
            })
            .unwrap();
        session
            .persist(&Category {
                category_code: CategoryCode::new(4),
                category_name: "한식".into(),
                ref_category_code: Some(CategoryCode::new(1)),
            })
            .unwrap();

        assert_eq!(seed_fixtures(&session).unwrap(), 21);

        let categories: Vec<Category> = session
            .create_typed_query("SELECT c FROM Category c")
            .unwrap()
            .result_list()
            .unwrap();
        assert_eq!(categories.len(), 12);
        let menus: Vec<Menu> = session
            .create_typed_query("SELECT m FROM Menu m")
            .unwrap()
            .result_list()
            .unwrap();
        assert_eq!(menus.len(), 21);
    }

    #[test]
    fn every_menu_category_exists() {
        for &(_, _, _, category, _) in MENUS {
            assert!(
                CATEGORIES.iter().any(|&(code, _, _)| code == category),
                "category {category} missing"
            );
        }
    }
}
