//! Route Handlers

pub mod drift;
pub mod predict;
