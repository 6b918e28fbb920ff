pub(crate) mod comic;
pub(crate) mod cpu;
pub(crate) mod panel;
pub(crate) mod pipeline;
