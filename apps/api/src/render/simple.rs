//! Single-column resume and cover-letter rendering.

use crate::models::{CoverLetterRecord, ResumeRecord, Skills};
use crate::render::escape::{escape_latex, fill_placeholders, itemize, join_inline};

/// Joins non-empty lines with a LaTeX line break.
fn break_lines(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|l| !l.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\\\\\n")
}

/// "start--end", or whichever side is present.
fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{}--{}", escape_latex(start), escape_latex(end)),
        (false, true) => escape_latex(start),
        (true, false) => escape_latex(end),
        (true, true) => String::new(),
    }
}

fn with_hfill(left: String, right: String) -> String {
    if right.is_empty() {
        left
    } else {
        format!("{left} \\hfill {right}")
    }
}

fn block(lines: &[String], bullets: String) -> String {
    let head = break_lines(lines);
    match (head.is_empty(), bullets.is_empty()) {
        (_, true) => head,
        (true, false) => bullets,
        (false, false) => format!("{head}\n{bullets}"),
    }
}

pub fn render_skills(skills: &Skills) -> String {
    match skills {
        Skills::Flat(items) => join_inline(items),
        Skills::Grouped(groups) => {
            let lines: Vec<String> = groups
                .iter()
                .map(|(group, items)| {
                    format!("\\textbf{{{}}}: {}", escape_latex(group), join_inline(items))
                })
                .collect();
            break_lines(&lines)
        }
    }
}

fn render_experience(record: &ResumeRecord) -> String {
    record
        .experience
        .iter()
        .map(|exp| {
            let title = match (exp.role.is_empty(), exp.company.is_empty()) {
                (false, false) => format!(
                    "\\textbf{{{}}} --- {}",
                    escape_latex(&exp.role),
                    escape_latex(&exp.company)
                ),
                (false, true) => format!("\\textbf{{{}}}", escape_latex(&exp.role)),
                (true, _) => format!("\\textbf{{{}}}", escape_latex(&exp.company)),
            };
            let header = with_hfill(title, date_range(&exp.start, &exp.end));
            block(&[header, escape_latex(&exp.location)], itemize(&exp.bullets))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_projects(record: &ResumeRecord) -> String {
    record
        .projects
        .iter()
        .map(|pr| {
            let header = with_hfill(
                format!("\\textbf{{{}}}", escape_latex(&pr.name)),
                escape_latex(&pr.url),
            );
            block(&[header, escape_latex(&pr.description)], itemize(&pr.bullets))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_education(record: &ResumeRecord) -> String {
    record
        .education
        .iter()
        .map(|ed| {
            let mut title = format!("\\textbf{{{}}}", escape_latex(&ed.degree));
            if !ed.institution.is_empty() {
                title.push_str(", ");
                title.push_str(&escape_latex(&ed.institution));
            }
            if !ed.location.is_empty() {
                title.push_str(" --- ");
                title.push_str(&escape_latex(&ed.location));
            }
            let header = with_hfill(title, date_range(&ed.start, &ed.end));
            break_lines(&[header, escape_latex(&ed.details)])
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders the single-column resume template.
pub fn render_resume(template: &str, record: &ResumeRecord) -> String {
    fill_placeholders(
        template,
        &[
            ("{{NAME}}", escape_latex(&record.name)),
            ("{{EMAIL}}", escape_latex(&record.email)),
            ("{{PHONE}}", escape_latex(&record.phone)),
            ("{{LINKS}}", escape_latex(&record.links)),
            ("{{SUMMARY}}", escape_latex(&record.summary)),
            ("{{SKILLS}}", render_skills(&record.skills)),
            ("{{EXPERIENCE}}", render_experience(record)),
            ("{{PROJECTS}}", render_projects(record)),
            ("{{EDUCATION}}", render_education(record)),
            ("{{CERTIFICATIONS}}", itemize(&record.certifications)),
        ],
    )
}

pub fn render_cover_letter(template: &str, record: &CoverLetterRecord) -> String {
    fill_placeholders(
        template,
        &[
            ("{{NAME}}", escape_latex(&record.name)),
            ("{{EMAIL}}", escape_latex(&record.email)),
            ("{{PHONE}}", escape_latex(&record.phone)),
            ("{{LINKS}}", escape_latex(&record.links)),
            ("{{COMPANY}}", escape_latex(&record.company)),
            (
                "{{HIRING_MANAGER}}",
                escape_latex(record.hiring_manager_or_default()),
            ),
            ("{{JOB_TITLE}}", escape_latex(&record.job_title)),
            ("{{OPENING}}", escape_latex(&record.opening)),
            ("{{SKILLS_FIT}}", escape_latex(&record.skills_fit)),
            ("{{CONCLUSION}}", escape_latex(&record.conclusion)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience, Project};
    use crate::render::unresolved_placeholders;

    const RESUME_TEMPLATE: &str = include_str!("../../templates/resume.tex");
    const COVER_TEMPLATE: &str = include_str!("../../templates/cover_letter.tex");

    fn has_unresolved_tokens(tex: &str) -> bool {
        !unresolved_placeholders(tex).is_empty()
    }

    fn sample() -> ResumeRecord {
        ResumeRecord {
            name: "Jo_Ann O'Neil".into(),
            email: "jo@example.com".into(),
            summary: "Cut AWS spend by 40% & led R&D".into(),
            skills: Skills::Flat(vec!["C#".into(), "Rust".into()]),
            experience: vec![Experience {
                role: "Engineer".into(),
                company: "Acme $Corp".into(),
                start: "2020".into(),
                end: "Present".into(),
                bullets: vec!["Shipped 3 services".into(), "Owned on-call ~weekly".into()],
                ..Default::default()
            }],
            projects: vec![Project {
                name: "tool_kit".into(),
                url: "github.com/x/tool_kit".into(),
                description: "CLI".into(),
                bullets: vec![],
            }],
            education: vec![Education {
                institution: "MIT".into(),
                degree: "BSc".into(),
                details: "GPA 3.9".into(),
                ..Default::default()
            }],
            certifications: vec!["CKA #123".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_record_renders_without_tokens() {
        let tex = render_resume(RESUME_TEMPLATE, &ResumeRecord::default());
        assert!(!tex.trim().is_empty());
        assert!(!has_unresolved_tokens(&tex));
        assert!(tex.trim_end().ends_with(r"\end{document}"));
        assert!(!tex.contains(r"\begin{itemize}"));
    }

    #[test]
    fn test_fields_are_escaped() {
        let tex = render_resume(RESUME_TEMPLATE, &sample());
        assert!(tex.contains(r"Jo\_Ann"));
        assert!(tex.contains(r"40\% \& led R\&D"));
        assert!(tex.contains(r"Acme \$Corp"));
        assert!(tex.contains(r"on-call \~{}weekly"));
        assert!(tex.contains(r"C\#, Rust"));
        assert!(tex.contains(r"tool\_kit"));
        assert!(tex.contains(r"\item CKA \#123"));
        assert!(!has_unresolved_tokens(&tex));
    }

    #[test]
    fn test_experience_header_layout() {
        let tex = render_resume(RESUME_TEMPLATE, &sample());
        assert!(tex.contains(r"\textbf{Engineer} --- Acme \$Corp \hfill 2020--Present"));
        assert!(tex.contains(r"\item Shipped 3 services"));
    }

    #[test]
    fn test_grouped_skills_render_one_line_per_group() {
        let skills = Skills::Grouped(vec![
            ("Languages".into(), vec!["Rust".into(), "Go".into()]),
            ("Cloud & Ops".into(), vec!["AWS".into()]),
        ]);
        assert_eq!(
            render_skills(&skills),
            "\\textbf{Languages}: Rust, Go\\\\\n\\textbf{Cloud \\& Ops}: AWS"
        );
    }

    #[test]
    fn test_education_includes_details() {
        let tex = render_resume(RESUME_TEMPLATE, &sample());
        assert!(tex.contains("\\textbf{BSc}, MIT\\\\\nGPA 3.9"));
    }

    #[test]
    fn test_cover_letter_defaults_hiring_manager() {
        let record = CoverLetterRecord {
            name: "Ada".into(),
            company: "Babbage & Co".into(),
            opening: "I build engines.".into(),
            ..Default::default()
        };
        let tex = render_cover_letter(COVER_TEMPLATE, &record);
        assert!(tex.contains("Dear Hiring Manager,"));
        assert!(tex.contains(r"Babbage \& Co"));
        assert!(!has_unresolved_tokens(&tex));
    }

    #[test]
    fn test_empty_cover_letter_renders_without_tokens() {
        let tex = render_cover_letter(COVER_TEMPLATE, &CoverLetterRecord::default());
        assert!(!has_unresolved_tokens(&tex));
        assert!(tex.trim_end().ends_with(r"\end{document}"));
    }
}
