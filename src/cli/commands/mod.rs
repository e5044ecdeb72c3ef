mod configure;
mod pins;
mod shell;

pub use configure::{add, remove};
pub use pins::{boards, list, switch};
pub use shell::shell;
