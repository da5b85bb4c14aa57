//! Modules layer - Infrastructure components behind the feature services
//!
//! Contains adapters for resources outside the database, currently the
//! local-disk file store.

pub mod storage;
