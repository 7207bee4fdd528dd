//! Prompt text sent to the feedback provider.

use crate::phase::NoteSection;

/// System message establishing the interviewer persona.
pub const INTERVIEWER_SYSTEM_PROMPT: &str = r#"You are a senior staff engineer conducting a system design interview. You have 15+ years of experience
building large-scale distributed systems at top tech companies.

Guide the candidate through a structured interview in a professional, helpful and encouraging tone:
- Introduction and problem understanding
- Clarifying questions and assumptions
- Functional requirements
- Non-functional requirements and scale
- High-level system design
- Deep dive into components

When giving feedback, comment on architectural decisions and trade-offs, scalability, technology
choices and design patterns. Keep responses concise, explain the "why" behind each point, and
judge the candidate's thought process and communication rather than knowledge of specific products."#;

/// Per-section evaluation request.
pub fn evaluation_prompt(section: NoteSection, content: &str, question: &str) -> String {
    format!(
        r#"As an experienced system design interviewer, evaluate the following section from a candidate's interview:

Section: {section}
Content: {content}
Question: {question}

Please provide:
1. A concise evaluation (2-3 sentences max)
2. Key strengths and areas for improvement
3. A score from 1-5 (5 being excellent), on its own line as "Score: N/5"

Focus on:
- Completeness and accuracy
- Depth of thinking
- Realistic considerations
- Clear communication

Keep your response concise and actionable."#,
        section = section.label(),
        content = content.trim(),
        question = question,
    )
}

/// Nudge for a candidate stuck on a section. Must not reveal the answer.
pub fn hint_prompt(section: NoteSection, question: &str) -> String {
    format!(
        r#"The candidate seems to be struggling with {section} for the question: {question}

Provide a helpful hint that:
1. Doesn't give away the answer directly
2. Guides them toward the right thinking
3. Encourages them to continue
4. Is specific to this section and question

Keep it encouraging and brief (1-2 sentences)."#,
        section = section.label(),
        question = question,
    )
}
