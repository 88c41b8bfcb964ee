//! Ecom domain, persistence, and checkout workflow.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod storage;
pub mod unit_of_work;

#[cfg(test)]
mod test;

mod uuids;
