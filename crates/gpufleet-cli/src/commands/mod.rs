//! Command handlers grouped by concern.

pub(crate) mod manage;
pub(crate) mod servers;
