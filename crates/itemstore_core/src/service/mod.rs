//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Validate inputs and enforce uniqueness before persistence.
//! - Translate repository failures into the `StoreError` taxonomy.
//! - Keep HTTP and other callers decoupled from storage details.

pub mod error;
pub mod health;
pub mod item_service;
pub mod task_service;
