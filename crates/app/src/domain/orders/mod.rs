//! Orders

pub mod records;
mod repository;
