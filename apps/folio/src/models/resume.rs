use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// The parsed `data/resume.json` payload. Every section is optional; an absent section is
/// never rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub personal: Option<PersonalInfo>,
    pub education: Option<Vec<EducationEntry>>,
    pub skills: Option<SkillCategories>,
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(deserialize_with = "optional_string_list")]
    pub about: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub title: Option<String>,
    pub intro: Option<String>,
    pub avatar: Option<String>,
    pub contacts: Option<Contacts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacts {
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(deserialize_with = "null_as_default")]
    pub major: String,
    pub degree: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "optional_string_list")]
    pub honors: Option<Vec<String>>,
}

impl EducationEntry {
    /// `major`, or `"major - degree"` when a degree is given.
    pub fn degree_label(&self) -> String {
        match present(&self.degree) {
            Some(degree) => format!("{} - {degree}", self.major),
            None => self.major.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub technologies: Vec<String>,
    pub links: Option<ProjectLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLinks {
    pub demo: Option<String>,
    pub github: Option<String>,
}

impl ProjectEntry {
    pub fn demo_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| present(&l.demo))
    }

    pub fn code_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| present(&l.github))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

// A `null` where a value is expected reads as the empty default, so one odd entry never rejects
// the whole document.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// List of strings; `null` reads as empty and `null` entries are dropped.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_list(deserializer)?.unwrap_or_default())
}

fn optional_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(list.map(|items| items.into_iter().flatten().collect()))
}

/// Returns the value only if it is present and non-empty.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Skill categories
// ────────────────────────────────────────────────────────────────────────────

/// One titled group of skill tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// `category -> [skill]` mapping that keeps the key order of the source JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillCategories(pub Vec<SkillCategory>);

impl SkillCategories {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = SkillCategories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category names to lists of skills")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut categories = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, skills)) = map.next_entry::<String, Option<Vec<Option<String>>>>()? {
                    let skills = skills.unwrap_or_default().into_iter().flatten().collect();
                    categories.push(SkillCategory { name, skills });
                }
                Ok(SkillCategories(categories))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document_deserializes() {
        let json = r#"{
            "personal": {
                "name": "张三", "title": "Engineer", "intro": "Hi",
                "avatar": "images/avatar.jpg",
                "contacts": {"email": "a@b.c", "github": "https://github.com/a"}
            },
            "education": [{"school": "MIT", "major": "CS", "degree": "BS",
                           "startDate": "2016-09", "endDate": "2020-06", "honors": ["Dean's list"]}],
            "skills": {"Languages": ["Rust", "Go"], "Tools": ["Git"]},
            "projects": [{"name": "P", "description": "D", "image": "p.png",
                          "startDate": "2021-01", "technologies": ["Rust"],
                          "links": {"demo": null, "github": "https://x"}}],
            "about": ["one", "two"]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        let personal = doc.personal.unwrap();
        assert_eq!(personal.name.as_deref(), Some("张三"));
        assert_eq!(personal.contacts.unwrap().linkedin, None);
        assert_eq!(doc.education.unwrap()[0].degree_label(), "CS - BS");
        assert_eq!(doc.skills.unwrap().len(), 2);
        let project = &doc.projects.unwrap()[0];
        assert_eq!(project.demo_link(), None);
        assert_eq!(project.code_link(), Some("https://x"));
        assert_eq!(doc.about.unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_skill_categories_keep_source_order() {
        let json = r#"{"skills": {"Zeta": ["z"], "Alpha": ["a", "b"], "Mid": []}}"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        let names: Vec<_> = doc.skills.unwrap().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_missing_and_extra_fields_tolerated() {
        let json = r#"{"education": [{"school": "X"}], "unknown": 1, "projects": [{}]}"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        let edu = &doc.education.unwrap()[0];
        assert_eq!(edu.major, "");
        assert_eq!(edu.start_date, None);
        assert_eq!(edu.degree_label(), "");
        assert!(doc.projects.unwrap()[0].technologies.is_empty());
        assert!(doc.personal.is_none());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let json = r#"{
            "personal": {"name": "Ada"},
            "education": [{"school": null, "major": "CS", "honors": [null, "Prize"]}],
            "skills": {"Languages": ["Rust", null], "Empty": null},
            "projects": [{"name": null, "description": null, "image": null, "technologies": null}],
            "about": ["hi", null]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        let edu = &doc.education.unwrap()[0];
        assert_eq!(edu.school, "");
        assert_eq!(edu.major, "CS");
        assert_eq!(edu.honors.as_deref(), Some(&["Prize".to_string()][..]));
        let skills = doc.skills.unwrap();
        assert_eq!(skills.0[0].skills, vec!["Rust"]);
        assert!(skills.0[1].skills.is_empty());
        let project = &doc.projects.unwrap()[0];
        assert_eq!(project.name, "");
        assert!(project.technologies.is_empty());
        assert_eq!(doc.about.unwrap(), vec!["hi"]);
    }

    #[test]
    fn test_empty_strings_are_not_present() {
        let entry = EducationEntry {
            major: "CS".into(),
            degree: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(entry.degree_label(), "CS");
        let project = ProjectEntry {
            links: Some(ProjectLinks {
                demo: Some(String::new()),
                github: None,
            }),
            ..Default::default()
        };
        assert_eq!(project.demo_link(), None);
    }
}
