//! Prompt template for the question-answering chain
//!
//! A template is plain text with named slots written as `{name}`. Literal
//! braces are written doubled (`{{` and `}}`). The only slot the chain
//! fills is `{question}`; any other slot name is rejected when the
//! template is parsed, so rendering can never fail.

use crate::error::{MedchatError, Result};

/// Name of the slot filled with the user's question
pub const QUESTION_SLOT: &str = "question";

/// Framing used when the configuration does not supply a template
pub const DEFAULT_TEMPLATE: &str = "You are a help-desk chatbot for PC and office work in a medical setting. Answer the user's question politely.

Question: {question}

Answer:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Question,
}

/// A parsed prompt template with a single `{question}` slot
///
/// Parsing happens once; [`PromptTemplate::render`] is a pure function of
/// the question.
///
/// # Examples
///
/// ```
/// use medchat::prompts::PromptTemplate;
///
/// let template = PromptTemplate::from_template("Q: {question}\nA:").unwrap();
/// assert_eq!(template.render("Where is the printer?"), "Q: Where is the printer?\nA:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template string
    ///
    /// # Errors
    ///
    /// Returns `MedchatError::Template` if a brace is unbalanced, a slot is
    /// empty or names anything other than `question`, or the template has
    /// no `{question}` slot at all.
    pub fn from_template(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let segments = parse_segments(&source)?;

        if !segments.iter().any(|s| matches!(s, Segment::Question)) {
            return Err(MedchatError::Template(format!(
                "template must contain a {{{}}} slot",
                QUESTION_SLOT
            ))
            .into());
        }

        Ok(Self { source, segments })
    }

    /// The raw template text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template with `question` inserted verbatim
    ///
    /// No escaping is applied; braces inside the question are kept as-is.
    pub fn render(&self, question: &str) -> String {
        let capacity = self.source.len() + question.len();
        self.segments
            .iter()
            .fold(String::with_capacity(capacity), |mut out, segment| {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Question => out.push_str(question),
                }
                out
            })
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: parse_segments(DEFAULT_TEMPLATE).unwrap_or_default(),
        }
    }
}

fn parse_segments(source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '}' {
                        closed = true;
                        break;
                    }
                    name.push(n);
                }
                if !closed {
                    return Err(
                        MedchatError::Template(format!("unclosed '{{' at byte {}", pos)).into(),
                    );
                }
                let name = name.trim();
                if name != QUESTION_SLOT {
                    return Err(MedchatError::Template(format!(
                        "unknown slot '{{{}}}'; only {{{}}} is supported",
                        name, QUESTION_SLOT
                    ))
                    .into());
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Question);
            }
            '}' => {
                return Err(
                    MedchatError::Template(format!("unmatched '}}' at byte {}", pos)).into(),
                );
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_renders_question() {
        let template = PromptTemplate::default();
        let prompt = template.render("How do I reset my password?");
        assert!(prompt.starts_with("You are a help-desk chatbot"));
        assert!(prompt.contains("Question: How do I reset my password?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_default_matches_parsed_default() {
        let parsed = PromptTemplate::from_template(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(parsed, PromptTemplate::default());
    }

    #[test]
    fn test_render_is_pure() {
        let template = PromptTemplate::default();
        let first = template.render("same question");
        let second = template.render("same question");
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_empty_question() {
        let template = PromptTemplate::from_template("[{question}]").unwrap();
        assert_eq!(template.render(""), "[]");
    }

    #[test]
    fn test_question_inserted_verbatim() {
        let template = PromptTemplate::from_template("Q={question}").unwrap();
        assert_eq!(template.render("{not a slot} }}"), "Q={not a slot} }}");
    }

    #[test]
    fn test_escaped_braces() {
        let template = PromptTemplate::from_template("{{json}} {question} }}").unwrap();
        assert_eq!(template.render("x"), "{json} x }");
    }

    #[test]
    fn test_slot_may_repeat() {
        let template = PromptTemplate::from_template("{question} / { question }").unwrap();
        assert_eq!(template.render("a"), "a / a");
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let template = PromptTemplate::from_template("質問: {question}\n回答:").unwrap();
        assert_eq!(template.render("印刷できません"), "質問: 印刷できません\n回答:");
    }

    #[test]
    fn test_missing_slot_rejected() {
        let err = PromptTemplate::from_template("no slot here").unwrap_err();
        assert!(err.to_string().contains("{question}"));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let err = PromptTemplate::from_template("{question} {context}").unwrap_err();
        assert!(err.to_string().contains("unknown slot"));
    }

    #[test]
    fn test_unclosed_brace_rejected() {
        assert!(PromptTemplate::from_template("{question").is_err());
    }

    #[test]
    fn test_unmatched_close_rejected() {
        assert!(PromptTemplate::from_template("{question} }").is_err());
    }

    #[test]
    fn test_source_is_kept() {
        let template = PromptTemplate::from_template("Q: {question}").unwrap();
        assert_eq!(template.source(), "Q: {question}");
    }
}
