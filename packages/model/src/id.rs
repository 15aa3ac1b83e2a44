use uuid::Uuid;

/// Source of fresh element ids.
///
/// No uniqueness check is performed against the tree, so implementations must
/// never hand out the same id twice.
pub trait IdSource: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs (default for live sessions)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids for fixtures and tests
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("el")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
