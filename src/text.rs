pub(crate) mod bubble;
pub(crate) mod metrics;
pub(crate) mod wrap;
