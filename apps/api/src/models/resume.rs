//! Simple resume schema: flat contact fields, one-column layout.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::lenient::{self, text_items};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub links: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default, deserialize_with = "lenient::list")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end: String,
    /// Free text; often carries the GPA.
    #[serde(default, deserialize_with = "lenient::string")]
    pub details: String,
}

/// Skills arrive either as a flat list or grouped by category.
/// Grouped order is the order the categories appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub enum Skills {
    Flat(Vec<String>),
    Grouped(Vec<(String, Vec<String>)>),
}

impl Default for Skills {
    fn default() -> Self {
        Skills::Flat(Vec::new())
    }
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        match self {
            Skills::Flat(items) => items.is_empty(),
            Skills::Grouped(groups) => groups.iter().all(|(_, items)| items.is_empty()),
        }
    }

    /// All skill names in display order, group labels excluded.
    pub fn flatten(&self) -> Vec<String> {
        match self {
            Skills::Flat(items) => items.clone(),
            Skills::Grouped(groups) => groups
                .iter()
                .flat_map(|(_, items)| items.iter().cloned())
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Skills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Object(map)) => Skills::Grouped(
                map.into_iter()
                    .map(|(group, items)| (group, text_items(items)))
                    .collect(),
            ),
            Some(other) => Skills::Flat(text_items(other)),
            None => Skills::default(),
        })
    }
}

impl Serialize for Skills {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Skills::Flat(items) => items.serialize(serializer),
            Skills::Grouped(groups) => {
                let mut map = serializer.serialize_map(Some(groups.len()))?;
                for (group, items) in groups {
                    map.serialize_entry(group, items)?;
                }
                map.end()
            }
        }
    }
}
