use hemrisk_engine::RiskEngine;

/// Process-wide shared state. The engine is built before the listener
/// binds and is read-only afterwards, so handlers share it without
/// locking.
pub struct ServerState {
    pub engine: RiskEngine,
}

impl ServerState {
    pub fn new(engine: RiskEngine) -> Self {
        Self { engine }
    }
}
