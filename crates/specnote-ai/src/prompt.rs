//! Prompt assembly.

/// Instruction sent with every request so replies can be spliced straight
/// into a markdown document.
pub const SYSTEM_INSTRUCTION: &str = "You are SpecNote AI, an assistant integrated into a Markdown editor.
Your goal is to help draft, rewrite, summarize, and structure notes while strictly preserving Markdown syntax.
- Headings should use # notation.
- Lists should use - or 1. notation.
- Code blocks should be fenced with ```.
- Do not use conversational filler (e.g., \"Here is the summary:\") unless explicitly asked.
- Output raw markdown that is ready to be inserted directly into the document.";

/// Combine document context and the user's task into the outbound prompt.
///
/// An empty context yields the task unchanged.
pub fn build_prompt(task: &str, context: &str) -> String {
    if context.is_empty() {
        task.to_string()
    } else {
        format!("Context:\n{context}\n\nTask:\n{task}")
    }
}
