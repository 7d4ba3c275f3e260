// Prompt templates for resume analysis.
// Each section is filled independently so user text is never re-scanned
// for placeholders.

/// Resume evaluation section. Replace `{resume_text}` before sending.
pub const RESUME_EVALUATION_TEMPLATE: &str = r#"You are an experienced HR professional specializing in resume evaluation and career guidance.
Your task is to analyze the following resume, identify key strengths and weaknesses, and provide detailed feedback.
Format your answer as Markdown, with one heading per numbered section.

1. Resume Evaluation:
- Identify strong points in the candidate's profile.
- Highlight weak areas or missing information that could be improved.
- List all key skills mentioned in the resume.
- Suggest ways to improve the resume in terms of content, structure, and formatting.
- Recommend relevant courses, certifications, or skills that can enhance the candidate's profile.

Resume:
{resume_text}
"#;

/// Job compatibility section. Replace `{job_description}` before sending.
pub const JOB_COMPATIBILITY_TEMPLATE: &str = r#"
2. Job Compatibility Analysis:
Compare the given resume against the provided job description.
- List the skills required for this job.
- Compare them with the skills found in the resume.
- Identify any missing or weak areas that need improvement.
- Provide a percentage match score (0-100%) indicating how well the resume aligns with the job.

Job Description:
{job_description}
"#;

/// Builds the single prompt sent to the model. The job compatibility section
/// is appended only when a non-blank job description is present.
pub fn compose(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = RESUME_EVALUATION_TEMPLATE.replace("{resume_text}", resume_text);

    if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
        prompt.push_str(&JOB_COMPATIBILITY_TEMPLATE.replace("{job_description}", jd));
    }

    prompt
}
