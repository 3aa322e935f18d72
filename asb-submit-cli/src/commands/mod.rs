pub(crate) mod config;
pub(crate) mod guid;
pub(crate) mod inspect;
pub(crate) mod submit;
