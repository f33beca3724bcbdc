//! SeaORM entities

pub mod link;
pub mod user;
pub mod vote;
