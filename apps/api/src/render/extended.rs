//! Two-column resume rendering and its adapter onto the single-column schema.

use crate::models::extended::ExtendedResume;
use crate::models::resume::{Education, Experience, Project, ResumeRecord, Skills};
use crate::render::escape::{escape_latex, fill_placeholders, itemize_compact, join_tabitems};

const MAX_JOBS: usize = 3;
const MAX_POINTS: usize = 3;
const MAX_PROJECTS: usize = 3;
const MAX_EDUCATION: usize = 3;
const MAX_PUBLICATIONS: usize = 2;
const MAX_CERTIFICATIONS: usize = 3;

/// Caps list lengths to what the two-column layout can hold.
pub fn clamp_for_layout(record: &ExtendedResume) -> ExtendedResume {
    let mut clamped = record.clone();
    clamped.experience.truncate(MAX_JOBS);
    for job in &mut clamped.experience {
        job.points.truncate(MAX_POINTS);
    }
    clamped.projects.truncate(MAX_PROJECTS);
    clamped.education.truncate(MAX_EDUCATION);
    clamped.publications.truncate(MAX_PUBLICATIONS);
    clamped.certifications.truncate(MAX_CERTIFICATIONS);
    clamped
}

fn render_work(record: &ExtendedResume) -> String {
    record
        .experience
        .iter()
        .map(|job| {
            format!(
                "\\joblong{{{}}}{{{}}}{{{}}}{{%\n{}\n}}",
                escape_latex(&job.title),
                escape_latex(&job.company),
                escape_latex(&job.date),
                itemize_compact(&job.points)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_projects(record: &ExtendedResume) -> String {
    record
        .projects
        .iter()
        .map(|pr| {
            format!(
                "\\project{{{}}}{{{}}}{{{}}}",
                escape_latex(&pr.title),
                escape_latex(&pr.link),
                escape_latex(&pr.desc)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_education_rows(record: &ExtendedResume) -> String {
    record
        .education
        .iter()
        .map(|ed| {
            let gpa = if ed.gpa.is_empty() {
                String::new()
            } else {
                format!("(GPA: {})", escape_latex(&ed.gpa))
            };
            format!(
                "{} & {} \\textbf{{at}} {} & {}\\\\",
                escape_latex(&ed.date),
                escape_latex(&ed.degree),
                escape_latex(&ed.institute),
                gpa
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_publications(record: &ExtendedResume) -> String {
    let citations: Vec<&str> = record
        .publications
        .iter()
        .map(|p| p.citation.as_str())
        .collect();
    itemize_compact(&citations)
}

/// Renders the two-column template. The caller clamps first (see `clamp_for_layout`).
pub fn render_extended(template: &str, record: &ExtendedResume) -> String {
    let contact = &record.contact;
    fill_placeholders(
        template,
        &[
            ("{{NAME}}", escape_latex(&record.name)),
            ("{{GITHUB}}", escape_latex(&contact.github)),
            ("{{LINKEDIN}}", escape_latex(&contact.linkedin)),
            ("{{WEBSITE}}", escape_latex(&contact.website)),
            ("{{EMAIL}}", escape_latex(&contact.email)),
            ("{{PHONE}}", escape_latex(&contact.phone)),
            ("{{SUMMARY}}", escape_latex(&record.summary)),
            ("{{WORK}}", render_work(record)),
            ("{{PROJECTS}}", render_projects(record)),
            ("{{EDU_ROWS}}", render_education_rows(record)),
            ("{{PUBLICATIONS}}", render_publications(record)),
            ("{{SKILLS_LEFT}}", join_tabitems(&record.skills_left)),
            ("{{SKILLS_RIGHT}}", join_tabitems(&record.skills_right)),
            ("{{CERTIFICATIONS}}", join_tabitems(&record.certifications)),
        ],
    )
}

/// Splits "Jan 2023 – Present" at the first hyphen-like separator.
/// Without a separator the whole string is the start.
pub fn split_date_range(date: &str) -> (String, String) {
    match date.find(|c: char| matches!(c, '-' | '\u{2013}' | '\u{2014}')) {
        Some(idx) => {
            let sep_len = date[idx..].chars().next().map_or(1, char::len_utf8);
            (
                date[..idx].trim().to_string(),
                date[idx + sep_len..].trim().to_string(),
            )
        }
        None => (date.trim().to_string(), String::new()),
    }
}

/// Maps extended-schema fields onto the single-column schema, unescaped.
/// The single-column renderer escapes everything on the way out.
pub fn to_simple(record: &ExtendedResume) -> ResumeRecord {
    let mut skills = record.skills_left.clone();
    skills.extend(record.skills_right.iter().cloned());

    ResumeRecord {
        name: record.name.clone(),
        email: record.contact.email.clone(),
        phone: record.contact.phone.clone(),
        links: record.contact.links().join(", "),
        summary: record.summary.clone(),
        skills: Skills::Flat(skills),
        experience: record
            .experience
            .iter()
            .map(|job| {
                let (start, end) = split_date_range(&job.date);
                Experience {
                    role: job.title.clone(),
                    company: job.company.clone(),
                    location: String::new(),
                    start,
                    end,
                    bullets: job.points.clone(),
                }
            })
            .collect(),
        projects: record
            .projects
            .iter()
            .map(|pr| Project {
                name: pr.title.clone(),
                url: pr.link.clone(),
                description: pr.desc.clone(),
                bullets: Vec::new(),
            })
            .collect(),
        education: record
            .education
            .iter()
            .map(|ed| Education {
                institution: ed.institute.clone(),
                degree: ed.degree.clone(),
                location: String::new(),
                start: String::new(),
                end: ed.date.clone(),
                details: ed.gpa.clone(),
            })
            .collect(),
        certifications: record.certifications.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::extended::{Contact, ExtendedEducation, ExtendedProject, Job, Publication};
    use crate::render::unresolved_placeholders;

    const TEMPLATE: &str = include_str!("../../templates/resume_template.tex");

    fn job(points: usize) -> Job {
        Job {
            title: "Engineer".into(),
            company: "Acme".into(),
            date: "Jan 2021 – Present".into(),
            points: (0..points).map(|i| format!("Point {i}")).collect(),
        }
    }

    #[test]
    fn test_split_date_range_variants() {
        assert_eq!(
            split_date_range("Jan 2023 – Present"),
            ("Jan 2023".to_string(), "Present".to_string())
        );
        assert_eq!(
            split_date_range("2019-2021"),
            ("2019".to_string(), "2021".to_string())
        );
        assert_eq!(
            split_date_range("2020 - 2022 - extra"),
            ("2020".to_string(), "2022 - extra".to_string())
        );
        assert_eq!(split_date_range("Summer 2022"), ("Summer 2022".to_string(), String::new()));
        assert_eq!(split_date_range(""), (String::new(), String::new()));
    }

    #[test]
    fn test_clamp_caps_every_list_and_keeps_order() {
        let record = ExtendedResume {
            experience: (0..5).map(|_| job(5)).collect(),
            projects: (0..5)
                .map(|i| ExtendedProject {
                    title: format!("P{i}"),
                    ..Default::default()
                })
                .collect(),
            publications: (0..4)
                .map(|i| Publication {
                    citation: format!("C{i}"),
                })
                .collect(),
            certifications: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..Default::default()
        };
        let clamped = clamp_for_layout(&record);
        assert_eq!(clamped.experience.len(), 3);
        assert!(clamped.experience.iter().all(|j| j.points.len() == 3));
        assert_eq!(clamped.experience[0].points[2], "Point 2");
        assert_eq!(
            clamped.projects.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
            vec!["P0", "P1", "P2"]
        );
        assert_eq!(clamped.publications.len(), 2);
        assert_eq!(clamped.certifications, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_render_uses_job_and_project_macros() {
        let record = ExtendedResume {
            name: "Ada".into(),
            experience: vec![job(2)],
            projects: vec![ExtendedProject {
                title: "Engine_2".into(),
                link: "ada.dev".into(),
                desc: "Gears & levers".into(),
            }],
            education: vec![ExtendedEducation {
                date: "1835".into(),
                degree: "BSc".into(),
                institute: "Home".into(),
                gpa: "4.0".into(),
            }],
            skills_left: vec!["Rust".into(), "C#".into()],
            ..Default::default()
        };
        let tex = render_extended(TEMPLATE, &record);
        assert!(tex.contains("\\joblong{Engineer}{Acme}{Jan 2021 – Present}{%\n\\begin{itemize}[leftmargin=*]"));
        assert!(tex.contains(r"\project{Engine\_2}{ada.dev}{Gears \& levers}"));
        assert!(tex.contains(r"1835 & BSc \textbf{at} Home & (GPA: 4.0)\\"));
        assert!(tex.contains(r"Rust \tabitem C\#"));
        assert!(unresolved_placeholders(&tex).is_empty());
    }

    #[test]
    fn test_empty_record_renders_without_tokens() {
        let tex = render_extended(TEMPLATE, &ExtendedResume::default());
        assert!(unresolved_placeholders(&tex).is_empty());
        assert!(tex.trim_end().ends_with(r"\end{document}"));
    }

    #[test]
    fn test_to_simple_maps_fields_without_escaping() {
        let record = ExtendedResume {
            name: "Ada_L".into(),
            contact: Contact {
                github: "github.com/ada".into(),
                website: "ada.dev".into(),
                email: "a@x.io".into(),
                ..Default::default()
            },
            experience: vec![job(1)],
            education: vec![ExtendedEducation {
                date: "2020".into(),
                degree: "MSc".into(),
                institute: "ETH".into(),
                gpa: "5.8".into(),
            }],
            skills_left: vec!["Rust".into()],
            skills_right: vec!["SQL".into()],
            ..Default::default()
        };
        let simple = to_simple(&record);
        assert_eq!(simple.name, "Ada_L");
        assert_eq!(simple.links, "github.com/ada, ada.dev");
        assert_eq!(simple.skills, Skills::Flat(vec!["Rust".into(), "SQL".into()]));
        assert_eq!(simple.experience[0].start, "Jan 2021");
        assert_eq!(simple.experience[0].end, "Present");
        assert_eq!(simple.education[0].institution, "ETH");
        assert_eq!(simple.education[0].end, "2020");
        assert_eq!(simple.education[0].details, "5.8");
    }
}
