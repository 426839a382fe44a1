pub mod resume;

pub use resume::{
    Contacts, EducationEntry, PersonalInfo, ProjectEntry, ProjectLinks, ResumeDocument,
    SkillCategories, SkillCategory,
};
