use tracing::warn;

/// One recorded conformance failure: the scenario's name and what went
/// wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFailure {
    pub scenario: String,
    pub message: String,
}

/// Executes named scenarios and collects their failures.
///
/// A failing scenario records exactly one structured failure; the remaining
/// scenarios still run. Scenarios may build on state left behind by earlier
/// ones, so a failure can cascade, but it never aborts the battery.
#[derive(Debug, Default)]
pub struct Runner {
    failures: Vec<ScenarioFailure>,
}

impl Runner {
    pub fn new() -> Self {
        Runner::default()
    }

    pub fn scenario(&mut self, name: &str, body: impl FnOnce() -> Result<(), String>) {
        if let Err(message) = body() {
            warn!("Scenario '{}' failed: {}", name, message);
            self.failures.push(ScenarioFailure {
                scenario: name.to_string(),
                message,
            });
        }
    }

    pub fn into_failures(self) -> Vec<ScenarioFailure> {
        self.failures
    }
}
