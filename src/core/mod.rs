// Domain-layer modules and shared errors/models
pub mod classifier {
    pub use crate::classifier::*;
}

pub mod normalizer {
    pub use crate::normalizer::*;
}

pub mod views {
    pub use crate::views::*;
}

pub mod metrics {
    pub use crate::metrics::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
