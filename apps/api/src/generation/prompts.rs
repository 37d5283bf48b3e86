// Prompt templates for the tailoring and cover-letter pipelines.
// Slots are `{name}` and are filled with `llm_client::prompts::fill`.

use crate::llm_client::prompts::{fill, FACTUALITY_INSTRUCTION, JSON_ONLY_INSTRUCTION};

/// Single-column resume. Replace: {json_only}, {factuality}, {resume_text}, {job_description}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"{json_only}
Keys: name, email, phone, links, summary, skills (an object of category -> list, or a list),
experience (list of {"role", "company", "location", "start", "end", "bullets": [...]}),
projects (list of {"name", "url", "description", "bullets": [...]}),
education (list of {"institution", "degree", "location", "start", "end", "details"}),
certifications (list of strings).
Keep content concise so it fits a single page. {factuality}

Original Resume:
{resume_text}

Job Description:
{job_description}"#;

/// Two-column resume. Replace: {json_only}, {factuality}, {resume_text}, {job_description}
pub const EXTENDED_RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Using the original resume and the job description, return a single-page tailored resume.
{json_only}
Match this schema exactly:
{
  "name": "...",
  "contact": {"github": "...", "linkedin": "...", "website": "...", "email": "...", "phone": "..."},
  "summary": "...",
  "experience": [{"title": "...", "company": "...", "date": "...", "points": ["..."]}],
  "projects": [{"title": "...", "link": "...", "desc": "..."}],
  "education": [{"date": "...", "degree": "...", "institute": "...", "gpa": "..."}],
  "publications": [{"citation": "..."}],
  "skills_left": ["..."],
  "skills_right": ["..."],
  "certifications": ["..."]
}
{factuality} Prioritize keywords from the job description. Keep bullet points concise (at most two lines each) so the result fits one page. Write dates like "Jan 2023 – Present".

Original Resume:
{resume_text}

Job Description:
{job_description}"#;

/// Three-paragraph letter. Replace: {json_only}, {resume_text}, {job_description}, {job_title}, {company}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{json_only}
Keys: opening, skills_fit, conclusion (one paragraph each).
Keep the letter to one page when rendered and use ATS-friendly keywords.

Resume:
{resume_text}

Job Description:
{job_description}

Role: {job_title}
Company: {company}"#;

/// Free-form body. Replace: {json_only}, {resume_summary}, {job_description}, {role}, {company}
pub const EXTENDED_COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a concise, single-page professional cover letter in 3-4 short paragraphs tailored to the job description and company.
{json_only}
Schema: {"recipient": {"company": "...", "role": "..."}, "body": ["paragraph 1", "paragraph 2", "paragraph 3", "closing"], "signoff": "Full Name"}
Keep it ATS-friendly, factual and action-oriented.

Resume Summary:
{resume_summary}

Job Description:
{job_description}

Company: {company}
Role: {role}"#;

pub fn resume_prompt(resume_text: &str, job_description: &str) -> String {
    fill(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("factuality", FACTUALITY_INSTRUCTION),
            ("resume_text", resume_text),
            ("job_description", job_description),
        ],
    )
}

pub fn extended_resume_prompt(resume_text: &str, job_description: &str) -> String {
    fill(
        EXTENDED_RESUME_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("factuality", FACTUALITY_INSTRUCTION),
            ("resume_text", resume_text),
            ("job_description", job_description),
        ],
    )
}

pub fn cover_letter_prompt(
    resume_text: &str,
    job_description: &str,
    job_title: &str,
    company: &str,
) -> String {
    fill(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_text", resume_text),
            ("job_description", job_description),
            ("job_title", job_title),
            ("company", company),
        ],
    )
}

pub fn extended_cover_letter_prompt(
    resume_summary: &str,
    job_description: &str,
    role: &str,
    company: &str,
) -> String {
    fill(
        EXTENDED_COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("resume_summary", resume_summary),
            ("job_description", job_description),
            ("role", role),
            ("company", company),
        ],
    )
}
