pub(crate) mod glob;
