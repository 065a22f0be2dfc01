//! Scan aggregate: requests, results, and the recent-scan index

pub mod entities;
pub mod value_objects;
