// Prompt constants for the tailoring pipeline.

pub const TAILOR_SYSTEM: &str = "You are a helpful resume editor.";

/// Served in place of model output when the suggestion service reports
/// exhausted capacity.
pub const DEMO_SUGGESTIONS: &str = r#"🎯 **Resume Tailoring Suggestions** (Demo Mode)

**Key Skills to Highlight:**
• Emphasize React and JavaScript experience prominently
• Add specific project examples with measurable results
• Include any relevant certifications or courses

**Action Verbs to Use:**
• Developed, Implemented, Optimized, Collaborated
• Led, Managed, Designed, Delivered

**Tailored Bullet Points:**
• "Developed responsive React applications serving 1000+ users"
• "Collaborated with cross-functional teams to deliver frontend solutions"
• "Optimized JavaScript performance resulting in 30% faster load times"

**Keywords to Include:**
• Frontend Development, React.js, JavaScript, User Interface
• Responsive Design, Component Architecture, State Management

**Next Steps:**
• Add specific metrics and quantifiable achievements
• Include relevant technologies mentioned in the job description
• Customize your summary to match the role requirements

💡 **Note:** This is a demo response. To get AI-powered suggestions, please add credits to your account."#;

pub fn build_tailor_prompt(resume: &str, job: &str) -> String {
    format!(
        "Take this resume:\n{resume}\n\nAnd this job description:\n{job}\n\n\
         Suggest personalized edits and tailored resume bullets."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tailor_prompt_leaves_braces_in_input_alone() {
        let prompt = build_tailor_prompt("uses {job} templates", "{resume} parser");
        assert!(prompt.contains("uses {job} templates"));
        assert!(prompt.contains("{resume} parser"));
    }

    #[test]
    fn test_build_tailor_prompt_embeds_both_texts() {
        let prompt = build_tailor_prompt("Built APIs in Rust", "Backend engineer");
        assert!(prompt.starts_with("Take this resume:\nBuilt APIs in Rust\n"));
        assert!(prompt.contains("And this job description:\nBackend engineer\n"));
        assert!(prompt.ends_with("tailored resume bullets."));
    }
}
