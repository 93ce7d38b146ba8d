pub(crate) mod builtin;
pub(crate) mod decode;
pub(crate) mod fonts;
