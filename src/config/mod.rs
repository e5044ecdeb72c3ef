pub(crate) mod pin;
pub(crate) mod store;
