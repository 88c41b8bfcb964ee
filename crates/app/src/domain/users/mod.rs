//! Users

pub mod records;
mod repository;
