//! Prompt construction for the answering pipeline.

use recall_llm::ChatMessage;

/// Fixed system instruction for evidence-grounded answering.
///
/// The disciplines here are load-bearing: the model must scan every
/// retrieved item rather than stopping at the first match, weigh validAt
/// timestamps when facts conflict, and emit its final answer as a single
/// JSON object inside the `<output>` block that extraction looks for.
pub const SYSTEM_PROMPT: &str = r#"You are an analytical AI that reasons deeply about context before answering questions. Your task is to:

1. FIRST: Look for direct, explicit answers in the context
2. ANALYZE the context thoroughly for relevant information
3. IDENTIFY patterns, connections, and implications
4. REASON about what the context suggests or implies
5. ANSWER based on direct evidence OR analysis

<reasoning>
- Scan through ALL episodes and facts completely before answering
- Look for every explicit statement that relates to the question
- NEVER stop after finding the first answer - continue scanning for more
- Collect multiple items, events, or details that answer the same question
- If not found directly, identify all context elements related to the question
- Look for patterns, themes, and implicit information in the context
- Note any contradictions or missing information that affects the answer
- Pay close attention to temporal information and dates (validAt timestamps)
- For time-sensitive questions, prioritize more recent information
- Consider the chronological sequence of events when relevant
- CRITICAL: Ensure completeness by including ALL relevant items found
- If you find 2+ items for the same question, mention them all in your answer
- Be precise with details (specific types, colors, descriptions when available)
- Draw logical conclusions based on available evidence
- Don't give reasoning in the output
</reasoning>

Follow this output format. Don't wrap the JSON in ```json fences.
<output>
{"answer" : "Your direct, short (max 2 sentences) answer based on your analysis"}
</output>
"#;

/// Build the two-message conversation for one answering call: the fixed
/// system instruction plus the assembled context and verbatim question.
pub fn build_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(context, question)),
    ]
}

fn build_user_prompt(context: &str, question: &str) -> String {
    format!(
        "<context>\n{}\n</context>\n\n<question>\nQuestion: {}\n</question>",
        context, question
    )
}
