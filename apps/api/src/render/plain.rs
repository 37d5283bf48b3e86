//! Unstyled document outlines for the built-in PDF renderer.
//! These bypass the markup templates entirely, so nothing here is escaped.

use crate::compile::pdf_writer::{Block, PlainDocument};
use crate::models::{CoverLetterRecord, ExtendedResume, ResumeRecord};

const MAX_ENTRIES: usize = 3;
const MAX_POINTS: usize = 3;
const MAX_SKILLS_PER_COLUMN: usize = 12;
const PLACEHOLDER_NAME: &str = "Candidate Name";

fn joined<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn dated(text: String, date: &str) -> String {
    if date.trim().is_empty() {
        text
    } else {
        format!("{text} ({})", date.trim())
    }
}

fn header(doc: &mut PlainDocument, name: &str, contact: String) {
    let name = if name.trim().is_empty() {
        PLACEHOLDER_NAME
    } else {
        name
    };
    doc.push(Block::Title(name.to_string()))
        .push(Block::Text(contact));
}

fn section(doc: &mut PlainDocument, title: &str, present: bool) {
    if present {
        doc.push(Block::Heading(title.to_string()));
    }
}

pub fn resume_document(record: &ResumeRecord) -> PlainDocument {
    let mut doc = PlainDocument::new();
    header(
        &mut doc,
        &record.name,
        joined(&[&record.email, &record.phone, &record.links], " | "),
    );

    section(&mut doc, "Summary", !record.summary.is_empty());
    doc.push(Block::Text(record.summary.clone()));

    section(&mut doc, "Work Experience", !record.experience.is_empty());
    for exp in record.experience.iter().take(MAX_ENTRIES) {
        let title = joined(&[&exp.role, &exp.company], " \u{2014} ");
        let dates = joined(&[&exp.start, &exp.end], " \u{2013} ");
        doc.push(Block::Strong(dated(title, &dates)));
        for bullet in exp.bullets.iter().take(MAX_POINTS) {
            doc.push(Block::Bullet(bullet.clone()));
        }
    }

    section(&mut doc, "Projects", !record.projects.is_empty());
    for project in record.projects.iter().take(MAX_ENTRIES) {
        doc.push(Block::Strong(joined(&[&project.name, &project.url], " ")))
            .push(Block::Text(project.description.clone()));
    }

    section(&mut doc, "Education", !record.education.is_empty());
    for ed in record.education.iter().take(MAX_ENTRIES) {
        let title = joined(&[&ed.degree, &ed.institution], " \u{2014} ");
        let dates = joined(&[&ed.start, &ed.end], " \u{2013} ");
        doc.push(Block::Text(dated(title, &dates)))
            .push(Block::Text(ed.details.clone()));
    }

    let skills: Vec<String> = record
        .skills
        .flatten()
        .into_iter()
        .take(2 * MAX_SKILLS_PER_COLUMN)
        .collect();
    section(&mut doc, "Skills", !record.skills.is_empty());
    doc.push(Block::Text(skills.join(", ")));

    section(&mut doc, "Certifications", !record.certifications.is_empty());
    for cert in record.certifications.iter().take(MAX_ENTRIES) {
        doc.push(Block::Bullet(cert.clone()));
    }

    doc
}

pub fn extended_document(record: &ExtendedResume) -> PlainDocument {
    let contact = &record.contact;
    let mut doc = PlainDocument::new();
    header(
        &mut doc,
        &record.name,
        joined(
            &[
                &contact.email,
                &contact.phone,
                &contact.website,
                &contact.github,
                &contact.linkedin,
            ],
            " | ",
        ),
    );

    section(&mut doc, "Summary", !record.summary.is_empty());
    doc.push(Block::Text(record.summary.clone()));

    section(&mut doc, "Work Experience", !record.experience.is_empty());
    for job in record.experience.iter().take(MAX_ENTRIES) {
        let title = joined(&[&job.title, &job.company], " \u{2014} ");
        doc.push(Block::Strong(dated(title, &job.date)));
        for point in job.points.iter().take(MAX_POINTS) {
            doc.push(Block::Bullet(point.clone()));
        }
    }

    section(&mut doc, "Projects", !record.projects.is_empty());
    for project in record.projects.iter().take(MAX_ENTRIES) {
        doc.push(Block::Strong(joined(&[&project.title, &project.link], " ")))
            .push(Block::Text(project.desc.clone()));
    }

    section(&mut doc, "Education", !record.education.is_empty());
    for ed in record.education.iter().take(MAX_ENTRIES) {
        let title = joined(&[&ed.degree, &ed.institute], " \u{2014} ");
        doc.push(Block::Text(dated(title, &ed.date)));
        if !ed.gpa.trim().is_empty() {
            doc.push(Block::Text(format!("GPA: {}", ed.gpa.trim())));
        }
    }

    let skills: Vec<&str> = record
        .skills_left
        .iter()
        .take(MAX_SKILLS_PER_COLUMN)
        .chain(record.skills_right.iter().take(MAX_SKILLS_PER_COLUMN))
        .map(String::as_str)
        .collect();
    let skills = joined(&skills, ", ");
    section(&mut doc, "Skills", !skills.is_empty());
    doc.push(Block::Text(skills));

    doc
}

pub fn cover_letter_document(record: &CoverLetterRecord) -> PlainDocument {
    let mut doc = PlainDocument::new();
    header(
        &mut doc,
        &record.name,
        joined(&[&record.email, &record.phone, &record.links], " | "),
    );
    doc.push(Block::Text(joined(&[&record.job_title, &record.company], ", ")))
        .push(Block::Text(format!(
            "Dear {},",
            record.hiring_manager_or_default()
        )))
        .push(Block::Text(record.opening.clone()))
        .push(Block::Text(record.skills_fit.clone()))
        .push(Block::Text(record.conclusion.clone()))
        .push(Block::Text("Sincerely,".to_string()))
        .push(Block::Strong(record.name.clone()));
    doc
}
