//! Workflow modules for the lending console.

pub mod origination;
