//! Repository functions, one module per entity.
//!
//! Every function takes an open [`Session`](crate::session::Session) and
//! expresses its lookup as an object query.

pub mod categories;
pub mod menus;
