//! CLI command implementations.

pub(crate) mod batch;
pub(crate) mod catalog;
pub(crate) mod clean;
pub(crate) mod fetch;
pub(crate) mod list;
pub(crate) mod resume;
pub(crate) mod status;
