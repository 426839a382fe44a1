use super::{repopulate, tag_list, SectionOutcome};
use crate::dom::DomNode;
use crate::models::SkillCategories;
use crate::render::reveal::{RevealSink, REVEAL_MARKER};
use crate::render::RenderError;

const SKILLS_CONTAINER: &str = ".skills-grid";

/// One titled group per category, in document order, each holding its tags in list order.
/// An empty mapping clears the container.
pub fn render_skills(
    page: &mut DomNode,
    skills: &SkillCategories,
    sink: Option<&mut dyn RevealSink>,
) -> Result<SectionOutcome, RenderError> {
    let items = skills
        .iter()
        .map(|category| {
            DomNode::element("div")
                .with_class(&format!("skill-category {REVEAL_MARKER}"))
                .with_child(
                    DomNode::element("h3")
                        .with_class("skill-category-title")
                        .with_text(category.name.as_str()),
                )
                .with_child(
                    DomNode::element("div")
                        .with_class("skill-tags")
                        .with_children(tag_list("skill-tag", &category.skills)),
                )
        })
        .collect();
    repopulate(page, SKILLS_CONTAINER, items, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;
    use crate::models::SkillCategory;
    use crate::render::reveal::RevealRegistry;
    use crate::render::sections::fixtures;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_categories_and_tags_keep_order() {
        let mut page = fixtures::page();
        let skills = SkillCategories(vec![
            SkillCategory {
                name: "Backend".into(),
                skills: vec!["Rust".into(), "Go".into()],
            },
            SkillCategory {
                name: "Frontend".into(),
                skills: vec!["TypeScript".into()],
            },
        ]);
        let mut registry = RevealRegistry::new();
        render_skills(&mut page, &skills, Some(&mut registry)).unwrap();

        let grid = page.query_selector(&sel(".skills-grid")).unwrap();
        assert_eq!(grid.element_children().count(), 2);
        let titles: Vec<_> = page
            .query_selector_all(&sel(".skill-category-title"))
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(titles, vec!["Backend", "Frontend"]);
        let tags: Vec<_> = page
            .query_selector_all(&sel(".skill-category .skill-tag"))
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(tags, vec!["Rust", "Go", "TypeScript"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_mapping_clears_container() {
        let mut page = fixtures::page();
        let outcome = render_skills(&mut page, &SkillCategories::default(), None).unwrap();
        assert_eq!(outcome, SectionOutcome::Rendered { items: 0 });
        let grid = page.query_selector(&sel(".skills-grid")).unwrap();
        assert!(grid.children.is_empty());
    }
}
