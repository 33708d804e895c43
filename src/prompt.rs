use crate::options::{HumanizeOptions, Tone};

/// Instruction phrase for each tone.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Casual => {
            "Relaxed, conversational, and friendly. Use contractions and simpler vocabulary."
        }
        Tone::Professional => {
            "Polite, confident, and business-appropriate. Avoid slang but keep it accessible."
        }
        Tone::Academic => {
            "Formal, structured, and precise. Suitable for research or educational contexts."
        }
        Tone::Creative => {
            "Expressive, evocative, and engaging. Use vivid language and varied sentence structures."
        }
        Tone::Empathetic => {
            "Warm, understanding, and supportive. Focus on emotional resonance."
        }
        Tone::Standard => "Balanced, clear, and neutral.",
    }
}

/// Build the rewrite instruction sent alongside the document. Identical
/// options always produce identical text, so the mapping is unit-testable
/// without network access.
pub fn build_prompt(options: &HumanizeOptions) -> String {
    let audience = if options.target_audience().is_empty() {
        "General Audience"
    } else {
        options.target_audience()
    };

    let jargon = if options.simplify_complex_terms() {
        "Simplify jargon and complex terms where appropriate."
    } else {
        "Keep technical terminology intact but ensure context is clear."
    };

    let structure = if options.improve_flow() {
        "Prioritize sentence variety and paragraph transitions for better flow."
    } else {
        "Maintain the original structure strictly."
    };

    format!(
        "Task: Analyze the attached document and rewrite its content to be more human-like.\n\
         \n\
         Goal: Remove robotic phrasing, AI-generated patterns, and overly rigid structure. \
         The output should sound natural, engaging, and written by a skilled human author.\n\
         \n\
         Specific Instructions:\n\
         1. Tone: {tone}\n\
         2. Audience: {audience}\n\
         3. {jargon}\n\
         4. {structure}\n\
         5. Do not wrap the output in fenced code blocks. Output the text directly in \
         Markdown format (headings, lists, bolding allowed).\n\
         \n\
         Please rewrite the entire document following these guidelines.",
        tone = tone_instruction(options.tone()),
    )
}
