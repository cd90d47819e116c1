pub(crate) mod duplicates;
pub(crate) mod frames;
pub(crate) mod keyframes;
