pub(crate) mod framing;
pub(crate) mod plan;
