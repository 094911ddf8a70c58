//! Context assembly from retrieved records

use crate::models::RetrievedRecord;
use crate::models::SourceRef;

/// Grounding text plus the records it was built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    pub sources: Vec<SourceRef>,
    /// Raw content of each contributing record, for the degraded fallback
    pub contents: Vec<String>,
}

impl AssembledContext {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Assembler for creating context from retrieved records
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render `"{title}: {content}"` blocks separated by a blank line.
    ///
    /// Records without content are neither rendered nor cited.
    #[must_use]
    pub fn assemble(&self, records: &[RetrievedRecord]) -> AssembledContext {
        let mut blocks = Vec::new();
        let mut sources = Vec::new();
        let mut contents = Vec::new();

        for record in records.iter().filter(|r| r.has_content()) {
            blocks.push(format!("{}: {}", record.title, record.content));
            sources.push(SourceRef {
                title: record.title.clone(),
                score: record.score,
            });
            contents.push(record.content.clone());
        }

        AssembledContext {
            text: blocks.join("\n\n"),
            sources,
            contents,
        }
    }
}
