//! Instruction template with `{context}` and `{question}` slots.

const CONTEXT_SLOT: &str = "context";
const QUESTION_SLOT: &str = "question";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template has no {{{0}}} slot")]
    MissingSlot(&'static str),
    #[error("template has unknown slot {{{0}}}")]
    UnknownSlot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Context,
    Question,
}

/// A parsed instruction template.
///
/// A slot is an identifier wrapped in braces. `{{` and `}}` render as a single
/// literal brace. Braces around anything else (JSON snippets, `{}`) are kept
/// as literal text.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

fn is_slot_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PromptTemplate {
    /// # Errors
    ///
    /// Returns [`TemplateError`] when either slot is missing or an unknown slot is present.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(pos) = rest.find(['{', '}']) {
            let (head, tail) = rest.split_at(pos);
            literal.push_str(head);
            if let Some(after) = tail.strip_prefix("{{").or_else(|| tail.strip_prefix("}}")) {
                literal.push_str(&tail[..1]);
                rest = after;
                continue;
            }

            let after = &tail[1..];
            let slot = tail
                .strip_prefix('{')
                .and_then(|inner| inner.find('}').map(|close| &inner[..close]))
                .filter(|name| is_slot_name(name));
            let Some(name) = slot else {
                literal.push_str(&tail[..1]);
                rest = after;
                continue;
            };

            if !literal.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut literal)));
            }
            segments.push(match name {
                CONTEXT_SLOT => Segment::Context,
                QUESTION_SLOT => Segment::Question,
                other => return Err(TemplateError::UnknownSlot(other.to_owned())),
            });
            rest = &after[name.len() + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }

        if !segments.contains(&Segment::Context) {
            return Err(TemplateError::MissingSlot(CONTEXT_SLOT));
        }
        if !segments.contains(&Segment::Question) {
            return Err(TemplateError::MissingSlot(QUESTION_SLOT));
        }
        Ok(Self { segments })
    }

    /// Fill both slots. Values are inserted verbatim and never re-scanned for slots.
    #[must_use]
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Context => out.push_str(context),
                Segment::Question => out.push_str(question),
            }
        }
        out
    }
}
