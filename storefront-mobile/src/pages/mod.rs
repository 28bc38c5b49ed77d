//! Mobile pages

pub mod catalog;
