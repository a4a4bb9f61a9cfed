// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every analysis prompt read by marketing teams.
pub const PLAIN_LANGUAGE_INSTRUCTION: &str = "Use plain language that non-technical \
    marketing teams can understand and act on.";

/// Shape every issue returned by an analysis prompt must follow.
pub const ISSUE_FORMAT_INSTRUCTION: &str = "\
For each issue, provide:
- title: Short, specific title (e.g., \"Missing course start date\", \"Unclear call-to-action\")
- description: Clear explanation of what the problem is and why it matters to students
- suggestion: Specific action the marketing team can take to fix it (must be different from description)";

/// Closing reminder for structured copy prompts.
pub const CHARACTER_COUNT_INSTRUCTION: &str = "CRITICAL: Count characters for EACH field. \
    If any field exceeds its limit, revise it to fit.";
