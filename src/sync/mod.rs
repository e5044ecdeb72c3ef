pub(crate) mod state;
pub(crate) mod synchronizer;
