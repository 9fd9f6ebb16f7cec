// Shared prompt fragments. Each feature that calls the completion provider
// keeps its own prompts.rs alongside it and reuses these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY the JSON object, no other text. \
    Do NOT use markdown code fences. \
    Make sure the JSON is valid and properly formatted.";
