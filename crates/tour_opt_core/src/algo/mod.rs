pub(crate) mod analysis;
pub(crate) mod insertion;
pub(crate) mod kmove;
pub(crate) mod mst;
pub(crate) mod two_opt;
