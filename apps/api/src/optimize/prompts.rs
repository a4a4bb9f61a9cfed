// Prompt templates for the model-assisted page review.
// Placeholders are `{name}`; cross-cutting fragments come from llm_client::prompts.

pub const REVIEW_SYSTEM: &str = "You are a conversion-focused reviewer of university landing pages. \
    You score pages for marketing teams and respond only with JSON matching the requested schema.";

pub const COPY_REVIEW_TEMPLATE: &str = "You are evaluating a university landing page for {objective}.

Check if the content is clear and easy to understand:

Main Heading: {h1}
Subheadings: {h2}
Content: {paragraphs}

For this page type, students need to quickly find: {key_information}

Rate on a simple 0-10 scale:
- Is the main message clear within 3 seconds?
- Can you easily find the important information?
- Is the language simple and jargon-free?
- Does it focus on student benefits, not just facts?

Provide:
1. Score (0-10, where 10 is excellent)
2. List 2-3 specific issues with actionable suggestions

{issue_format}

{plain_language}";

pub const USABILITY_REVIEW_TEMPLATE: &str = "You are evaluating how easy a university landing page is to use.

Check the page structure:
Main Heading: {h1}
Subheadings: {h2}
Structure: {structure}

Rate on a simple 0-10 scale:
- Is important information at the top of the page?
- Can you quickly scan and find what you need?
- Is the content broken up with clear sections?
- Does the layout look organized (not cluttered)?

Provide:
1. Score (0-10, where 10 is excellent)
2. List 2-3 specific issues with actionable suggestions

{issue_format}

{plain_language} Avoid technical terms like \"HTML semantics\" or \"DOM structure\".";

pub const CONVERSION_REVIEW_TEMPLATE: &str = "You are evaluating conversion elements on a university {objective} page.

Check what actions students can take:
{actions}

{guidance}

Rate on a simple 0-10 scale:
- Are there clear action buttons students can click?
- Are the buttons easy to find (high up on page)?
- Are there multiple ways to convert (forms, videos, buttons)?
- Do button labels clearly say what happens when you click?

Provide:
1. Score (0-10, where 10 is excellent)
2. List 2-3 specific issues with actionable suggestions

{issue_format}

{plain_language}";
