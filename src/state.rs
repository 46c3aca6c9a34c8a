// src/state.rs
use std::sync::Arc;

use crate::services::generator::Generator;

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: impl Generator + 'static) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    pub fn shared(generator: impl Generator + 'static) -> SharedState {
        Arc::new(Self::new(generator))
    }
}
