pub const QUIZ_GENERATOR_PROMPT: &str = r#"You are an expert quiz generator. Create exactly {count} high-quality multiple choice questions based ONLY on the specific facts, concepts, and information presented in the text content.

## CONTENT FOCUS
- Test understanding of specific facts, concepts, details, or relationships mentioned in the text
- Focus on key ideas, processes, definitions, examples, data, procedures, or technical details
- Each question must reference specific information that can be found in the text
- All 4 answer options should be plausible and related to the topic

## FORBIDDEN TOPICS
- NEVER ask about document structure, format, purpose, metadata, chapters, or sections
- NEVER ask "What is the purpose of this document/PDF/text/chapter?"
- NEVER ask about the author, writer, or their intent unless explicitly discussed in the content
- NEVER ask about document organization or layout

## QUESTION VARIETY
Use diverse question formats:
- "Which of the following..." (testing specific facts)
- "What happens when..." (testing cause-effect relationships)
- "How does..." (testing processes or mechanisms)
- "Why is..." (testing reasoning or explanations)
- "In what situation would..." (testing application)
- "What is the main difference between..." (testing comparisons)
- "Which statement is true about..." (testing comprehension)
- "What would be the result if..." (testing consequences)

## EXPLANATION VARIETY
Avoid repeating one opening phrase. Rotate between forms such as:
- "The text explains that..."
- "This is because..."
- "The content describes..."
- "As stated in the material..."
- "The information shows..."
- "This occurs when..."

## OUTPUT FORMAT
Return ONLY valid JSON, no prose and no markdown:
[
  {
    "id": "q1",
    "question": "Which of the following best describes [specific concept]?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctAnswer": 0,
    "explanation": "The text explains that [specific details without repetitive phrasing]"
  }
]"#;

pub const QUIZ_CHUNK_PROMPT: &str = "Generate {count} multiple choice questions from this content:\n\n{content}";

pub const QUIZ_FALLBACK_PROMPT: &str = r#"Create {count} varied multiple choice questions about specific facts and concepts.

AVOID: document purpose, structure, chapters, author questions, repetitive "According to the text" phrases.

USE VARIED FORMATS: "Which of the following...", "What happens when...", "How does...", "Why is...", "What would result if..."

Return ONLY valid JSON: [{"id":"q1","question":"Which of the following describes [concept]?","options":["A","B","C","D"],"correctAnswer":0,"explanation":"This occurs because [details]"}]

Text: {content}"#;

pub fn quiz_generator_prompt(count: usize) -> String {
    QUIZ_GENERATOR_PROMPT.replace("{count}", &count.to_string())
}

pub fn quiz_chunk_prompt(count: usize, content: &str) -> String {
    QUIZ_CHUNK_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{content}", content)
}

pub fn quiz_fallback_prompt(count: usize, content: &str) -> String {
    QUIZ_FALLBACK_PROMPT
        .replace("{count}", &count.to_string())
        .replace("{content}", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_fill_in_count_and_content() {
        let system = quiz_generator_prompt(4);
        assert!(system.contains("Create exactly 4 high-quality"));
        assert!(!system.contains("{count}"));

        let user = quiz_chunk_prompt(2, "Photosynthesis converts light.");
        assert!(user.starts_with("Generate 2 multiple choice questions"));
        assert!(user.ends_with("Photosynthesis converts light."));

        let fallback = quiz_fallback_prompt(3, "Cells divide.");
        assert!(fallback.starts_with("Create 3 varied"));
        assert!(fallback.ends_with("Text: Cells divide."));
    }

    #[test]
    fn content_placeholders_inside_chunk_text_survive() {
        let user = quiz_chunk_prompt(1, "literal {count} in source");
        assert!(user.ends_with("literal {count} in source"));
    }
}
