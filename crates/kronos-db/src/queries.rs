//! Database query functions organized by domain.

pub mod authorizations;
pub mod settlements;
pub mod users;
