//! SeaORM models for the employee directory tables.

pub mod compensation;
pub mod direct_report;
pub mod employee;
