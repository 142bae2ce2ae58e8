//! Case record sources.

pub mod source {
    pub use crate::source::*;
}

pub mod prepare {
    pub use crate::prepare::*;
}
