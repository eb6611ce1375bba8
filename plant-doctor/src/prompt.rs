//! Prompt templates sent to the model gateway.
//!
//! Two personas, both named OkraBot: the plant-care expert for anything the
//! relatedness gate lets through, and the small-talk persona that nudges the
//! user back toward plants. The wording is part of the product; tests pin it.

/// Prompt for plant-related queries. `context` is an optional line such as
/// `Context: Possible Downy Mildew` that anchors the answer to a finding.
pub fn build_plant_prompt(input_text: &str, context: Option<&str>) -> String {
    let mut p = String::new();
    p.push_str("You're OkraBot, an expert in okra plant care. Respond to:\n\n");
    p.push_str(context.unwrap_or(""));
    p.push_str(&format!("\nUser query: \"{input_text}\"\n\n"));
    p.push_str("Guidelines:\n");
    p.push_str("1. Be concise but thorough\n");
    p.push_str("2. Use markdown formatting\n");
    p.push_str("3. For diseases include:\n");
    p.push_str("   - Key symptoms\n");
    p.push_str("   - Recommended treatments\n");
    p.push_str("   - Prevention tips\n");
    p.push_str("4. Maintain warm, helpful tone\n");
    p.push_str("5. Suggest timeline with \"Want timeline?\" if relevant\n\n");
    p.push_str("Response:");
    p
}

/// Prompt for everything that is not about plants.
pub fn build_general_prompt(input_text: &str) -> String {
    let mut p = String::new();
    p.push_str("You're OkraBot, a friendly chatbot. The user asked:\n\n");
    p.push_str(&format!("User: \"{input_text}\"\n\n"));
    p.push_str("Respond warmly but briefly, gently steering toward plant topics when appropriate.\n\n");
    p.push_str("Response:");
    p
}
