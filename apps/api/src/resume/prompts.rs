// Prompts for AI-assisted resume drafting.

/// System prompt shared by the basics and sections requests.
pub const GENERATION_SYSTEM: &str = "You are an expert resume writer. \
    You draft resumes tailored to a specific job description, using only facts \
    present in the candidate's existing resume. \
    Do NOT invent employers, degrees, dates or metrics.";

/// Drafting prompt. Replace `{existing_resume}` and `{job_description}` before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Create a new resume from my existing resume for the job description below.

Rewrite headlines, summaries and skill descriptions so they speak to the role,
reorder items so the most relevant come first, and drop items that do not help.
If no existing resume is provided, produce a sensible skeleton for the role with
placeholder text the candidate can edit, and leave contact fields empty.

EXISTING RESUME (JSON, may be "none"):
{existing_resume}

JOB DESCRIPTION:
{job_description}"#;
