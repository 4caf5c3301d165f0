//! Prompt construction for mockup generation

use crate::task::GenerationRequest;

const NO_DETAILS: &str = "None";

/// Build the generation prompt for a request.
///
/// The output depends only on the keyword, industry, optional details and the
/// target size, so identical requests always produce identical prompts.
pub fn build_prompt(request: &GenerationRequest, size: &str) -> String {
    let details = request
        .additional_details
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DETAILS);

    format!(
        "Create a professional website mockup based on:
Keyword/Topic: {keyword}
Industry: {industry}
Details: {details}

Requirements:
- Modern, colorful design
- Clear typography
- Good contrast and appropriate color palette
- Responsive layout
- Header, hero section, features, several thematic sections, CTA, contact form, footer
- Realistic content
- High-quality appearance
- Fit within {size} size, do not crop images

CRITICAL REQUIREMENTS FOR TEXT AND TYPOGRAPHY:
- All text must be CLEAN, READABLE, and PROFESSIONAL
- Use only standard characters
- Clear sans-serif typography (Arial, Helvetica, or modern web fonts)

Create a professional website mockup.",
        keyword = request.keyword,
        industry = request.industry,
    )
}
