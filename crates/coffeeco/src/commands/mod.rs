//! CLI command implementations.

pub(crate) mod escape;
pub(crate) mod format;

pub(crate) use escape::EscapeArgs;
pub(crate) use format::FormatArgs;
