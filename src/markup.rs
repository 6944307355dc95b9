pub(crate) mod attrs;
pub(crate) mod parser;
pub(crate) mod tree;
