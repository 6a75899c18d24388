//! # HTTP Handlers Module

pub mod employee;

pub use employee::{create_employee, get_employee, list_employees, update_employee};
