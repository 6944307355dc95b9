pub(crate) mod evaluator;
pub(crate) mod handlers;
pub(crate) mod opts;
