use bookbot_core::domain::{Context, ContextStore};

/// Context store for a single webhook turn.
///
/// Seeded from the contexts the platform sent. Writes replace any context of
/// the same name and are visible to reads later in the turn; `into_writes`
/// returns only what was written, in first-write order, for the response.
#[derive(Clone, Debug, Default)]
pub struct TurnContexts {
    inbound: Vec<Context>,
    written: Vec<Context>,
}

impl TurnContexts {
    pub fn new(inbound: Vec<Context>) -> Self {
        Self { inbound, written: Vec::new() }
    }

    pub fn written(&self) -> &[Context] {
        &self.written
    }

    pub fn into_writes(self) -> Vec<Context> {
        self.written
    }
}

impl ContextStore for TurnContexts {
    fn get(&self, name: &str) -> Option<&Context> {
        let matches = |context: &&Context| context.name.eq_ignore_ascii_case(name);
        self.written.iter().find(matches).or_else(|| self.inbound.iter().find(matches))
    }

    fn set(&mut self, context: Context) {
        match self.written.iter_mut().find(|existing| existing.name.eq_ignore_ascii_case(&context.name)) {
            Some(existing) => *existing = context,
            None => self.written.push(context),
        }
    }
}
