//! Request handlers

pub mod info;
pub mod ingestion;
