const ANALYSIS_TEMPLATE: &str = "
You are a professional resume reviewer.

Extract:
- Full Name
- Email Address
- Phone Number
- Top 5 Skills
- Work Experience
- Education

Then analyze:
- Strengths and Weaknesses
- Improvements
- Skill Recommendations
- Course Suggestions

Resume:
";

const COMPARISON_HEADER: &str = "

Compare with job description:
";

/// Assemble the resume-review prompt.
///
/// The job description comparison block is appended only when a non-blank
/// job description is given.
pub fn build_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = String::with_capacity(
        ANALYSIS_TEMPLATE.len() + resume_text.len() + job_description.map_or(0, str::len) + 64,
    );
    prompt.push_str(ANALYSIS_TEMPLATE);
    prompt.push_str(resume_text);
    prompt.push('\n');

    if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
        prompt.push_str(COMPARISON_HEADER);
        prompt.push_str(jd);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_job_description() {
        let prompt = build_prompt("Jane Doe\njane@example.com", None);
        assert!(prompt.contains("You are a professional resume reviewer."));
        assert!(prompt.contains("Resume:\nJane Doe\njane@example.com"));
        assert!(prompt.contains("- Top 5 Skills"));
        assert!(prompt.contains("- Course Suggestions"));
        assert!(!prompt.contains("job description"));
    }

    #[test]
    fn job_description_is_appended_after_instructions() {
        let prompt = build_prompt("Jane Doe", Some("Senior Rust developer, tokio"));
        let resume_at = prompt.find("Resume:\nJane Doe").unwrap();
        let compare_at = prompt.find("Compare with job description:").unwrap();
        assert!(compare_at > resume_at);
        assert!(prompt.ends_with("Compare with job description:\nSenior Rust developer, tokio\n"));
    }

    #[test]
    fn blank_job_description_is_ignored() {
        assert_eq!(build_prompt("text", Some("   ")), build_prompt("text", None));
        assert_eq!(build_prompt("text", Some("")), build_prompt("text", None));
    }
}
