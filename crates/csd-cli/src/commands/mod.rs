//! CLI command implementations

pub(crate) mod check;
pub(crate) mod common;
pub(crate) mod ddl;
pub(crate) mod mark;
pub(crate) mod report;
pub(crate) mod show;
