use std::sync::Arc;

use crate::infra::store::MovieStore;

/// Shared handler state: the single store instance constructed at startup.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<MovieStore>,
}
