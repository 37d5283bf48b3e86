//! Extended resume schema: contact sub-record, two skill columns, publications.

use serde::{Deserialize, Serialize};

use crate::models::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedResume {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::record")]
    pub contact: Contact,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub experience: Vec<Job>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub projects: Vec<ExtendedProject>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Vec<ExtendedEducation>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub publications: Vec<Publication>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills_left: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills_right: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient::string")]
    pub github: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub website: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
}

impl Contact {
    /// Non-empty web links in display order: github, linkedin, website.
    pub fn links(&self) -> Vec<&str> {
        [&self.github, &self.linkedin, &self.website]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    /// Combined range such as "Jan 2023 – Present".
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProject {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedEducation {
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub institute: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub gpa: String,
}

/// A single citation. Accepts `{"citation": "..."}` or a bare string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PublicationRepr")]
pub struct Publication {
    pub citation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PublicationRepr {
    Bare(String),
    Record {
        #[serde(default, deserialize_with = "lenient::string")]
        citation: String,
    },
}

impl From<PublicationRepr> for Publication {
    fn from(repr: PublicationRepr) -> Self {
        match repr {
            PublicationRepr::Bare(citation) | PublicationRepr::Record { citation } => {
                Publication { citation }
            }
        }
    }
}

impl ExtendedResume {
    /// Plain text of the tailored content, used for the post-tailoring relevance score.
    pub fn tailored_text(&self) -> String {
        let points = self
            .experience
            .iter()
            .flat_map(|job| job.points.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        let descriptions = self
            .projects
            .iter()
            .map(|p| p.desc.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let education = self
            .education
            .iter()
            .map(|e| format!("{} {}", e.degree, e.institute))
            .collect::<Vec<_>>()
            .join(" ");

        [
            self.summary.clone(),
            points,
            descriptions,
            education,
            self.skills_left.join(", "),
            self.skills_right.join(", "),
        ]
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extended_record_deserializes_full_schema() {
        let record: ExtendedResume = serde_json::from_value(json!({
            "name": "Ada Lovelace",
            "contact": {"github": "github.com/ada", "email": "ada@example.com"},
            "summary": "Engineer",
            "experience": [{"title": "Engineer", "company": "Acme", "date": "2020 - 2023", "points": ["Built X"]}],
            "projects": [{"title": "Engine", "link": "", "desc": "Analytical"}],
            "education": [{"date": "1835", "degree": "BSc", "institute": "Home", "gpa": 4.0}],
            "publications": [{"citation": "Notes, 1843"}, "Sketch of the engine"],
            "skills_left": ["Rust"],
            "skills_right": ["Math"],
            "certifications": null
        }))
        .unwrap();

        assert_eq!(record.contact.links(), vec!["github.com/ada"]);
        assert_eq!(record.education[0].gpa, "4.0");
        assert_eq!(record.publications.len(), 2);
        assert_eq!(record.publications[1].citation, "Sketch of the engine");
        assert!(record.certifications.is_empty());
    }

    #[test]
    fn test_null_contact_defaults() {
        let record: ExtendedResume = serde_json::from_value(json!({"contact": null})).unwrap();
        assert_eq!(record.contact, Contact::default());
    }

    #[test]
    fn test_tailored_text_includes_scored_sections() {
        let record = ExtendedResume {
            summary: "Backend engineer".into(),
            experience: vec![Job {
                points: vec!["Shipped Kubernetes operators".into()],
                ..Default::default()
            }],
            skills_right: vec!["Terraform".into()],
            ..Default::default()
        };
        let text = record.tailored_text();
        assert!(text.contains("Kubernetes"));
        assert!(text.contains("Terraform"));
        assert!(text.contains("Backend"));
    }
}
