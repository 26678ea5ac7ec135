// Shared prompt constants. Each template module defines its own prompt
// alongside its input/output types; this file carries cross-cutting
// fragments only.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Literal rendered into a prompt slot when its optional input is absent.
pub const NOT_AVAILABLE: &str = "Not available.";
