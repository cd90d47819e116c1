pub(crate) mod info;
pub(crate) mod layered;
pub(crate) mod manifest;
pub(crate) mod source;
