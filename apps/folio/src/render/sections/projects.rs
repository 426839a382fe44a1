use super::{repopulate, tag_list, SectionOutcome};
use crate::dom::DomNode;
use crate::models::ProjectEntry;
use crate::render::dates::format_date_range;
use crate::render::reveal::{RevealSink, REVEAL_MARKER};
use crate::render::RenderError;

const PROJECTS_CONTAINER: &str = ".projects-grid";

const GITHUB_ICON_PATH: &str = "M12 0c-6.626 0-12 5.373-12 12 0 5.302 3.438 9.8 8.207 11.387.599.111.793-.261.793-.577v-2.234c-3.338.726-4.033-1.416-4.033-1.416-.546-1.387-1.333-1.756-1.333-1.756-1.089-.745.083-.729.083-.729 1.205.084 1.839 1.237 1.839 1.237 1.07 1.834 2.807 1.304 3.492.997.107-.775.418-1.305.762-1.604-2.665-.305-5.467-1.334-5.467-5.931 0-1.311.469-2.381 1.236-3.221-.124-.303-.535-1.524.117-3.176 0 0 1.008-.322 3.301 1.23.957-.266 1.983-.399 3.003-.404 1.02.005 2.047.138 3.006.404 2.291-1.552 3.297-1.23 3.297-1.23.653 1.653.242 2.874.118 3.176.77.84 1.235 1.911 1.235 3.221 0 4.609-2.807 5.624-5.479 5.921.43.372.823 1.102.823 2.222v3.293c0 .319.192.694.801.576 4.765-1.589 8.199-6.086 8.199-11.386 0-6.627-5.373-12-12-12z";

/// One card per project: lazy image with demo/code overlay links, title, description,
/// date range and technology tags.
pub fn render_projects(
    page: &mut DomNode,
    projects: &[ProjectEntry],
    sink: Option<&mut dyn RevealSink>,
) -> Result<SectionOutcome, RenderError> {
    let items = projects.iter().map(project_card).collect();
    repopulate(page, PROJECTS_CONTAINER, items, sink)
}

fn project_card(project: &ProjectEntry) -> DomNode {
    let mut links = DomNode::element("div").with_class("project-links");
    if let Some(demo) = project.demo_link() {
        links.append_child(link_button(demo, "查看演示", demo_icon(), "演示"));
    }
    if let Some(code) = project.code_link() {
        links.append_child(link_button(code, "查看代码", github_icon(), "代码"));
    }

    let image = DomNode::element("div")
        .with_class("project-image")
        .with_child(
            DomNode::element("img")
                .with_attr("src", project.image.as_str())
                .with_attr("alt", project.name.as_str())
                .with_attr("loading", "lazy"),
        )
        .with_child(
            DomNode::element("div")
                .with_class("project-overlay")
                .with_child(links),
        );

    let time_range = format_date_range(project.start_date.as_deref(), project.end_date.as_deref());
    let content = DomNode::element("div")
        .with_class("project-content")
        .with_child(
            DomNode::element("h3")
                .with_class("project-title")
                .with_text(project.name.as_str()),
        )
        .with_child(
            DomNode::element("p")
                .with_class("project-description")
                .with_text(project.description.as_str()),
        )
        .with_child(
            DomNode::element("div").with_class("project-meta").with_child(
                DomNode::element("span")
                    .with_class("project-time")
                    .with_text(time_range),
            ),
        )
        .with_child(
            DomNode::element("div")
                .with_class("project-tech")
                .with_children(tag_list("tech-tag", &project.technologies)),
        );

    DomNode::element("article")
        .with_class(&format!("project-card {REVEAL_MARKER}"))
        .with_child(image)
        .with_child(content)
}

fn link_button(href: &str, aria_label: &str, icon: DomNode, label: &str) -> DomNode {
    DomNode::element("a")
        .with_attr("href", href)
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener noreferrer")
        .with_class("project-link-btn")
        .with_attr("aria-label", aria_label)
        .with_child(icon)
        .with_child(DomNode::element("span").with_text(label))
}

fn svg_icon() -> DomNode {
    DomNode::element("svg")
        .with_attr("width", "20")
        .with_attr("height", "20")
        .with_attr("viewBox", "0 0 24 24")
}

fn demo_icon() -> DomNode {
    svg_icon()
        .with_attr("fill", "none")
        .with_attr("stroke", "currentColor")
        .with_attr("stroke-width", "2")
        .with_child(DomNode::element("path").with_attr(
            "d",
            "M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6",
        ))
        .with_child(DomNode::element("polyline").with_attr("points", "15 3 21 3 21 9"))
        .with_child(
            DomNode::element("line")
                .with_attr("x1", "10")
                .with_attr("y1", "14")
                .with_attr("x2", "21")
                .with_attr("y2", "3"),
        )
}

fn github_icon() -> DomNode {
    svg_icon()
        .with_attr("fill", "currentColor")
        .with_child(DomNode::element("path").with_attr("d", GITHUB_ICON_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;
    use crate::models::ProjectLinks;
    use crate::render::sections::fixtures;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn project(name: &str, demo: Option<&str>, github: Option<&str>) -> ProjectEntry {
        ProjectEntry {
            name: name.into(),
            description: format!("{name} description"),
            image: format!("images/{name}.png"),
            start_date: Some("2023-01".into()),
            end_date: Some("2023-12".into()),
            technologies: vec!["Rust".into(), "Tokio".into()],
            links: Some(ProjectLinks {
                demo: demo.map(String::from),
                github: github.map(String::from),
            }),
        }
    }

    #[test]
    fn test_only_code_link_when_demo_null() {
        let mut page = fixtures::page();
        render_projects(&mut page, &[project("p", None, Some("https://x"))], None).unwrap();
        let buttons = page.query_selector_all(&sel(".project-link-btn"));
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].get_attribute("href"), Some("https://x"));
        assert_eq!(buttons[0].get_attribute("aria-label"), Some("查看代码"));
    }

    #[test]
    fn test_card_contents() {
        let mut page = fixtures::page();
        let projects = vec![
            project("alpha", Some("https://demo"), Some("https://code")),
            project("beta", None, None),
        ];
        let outcome = render_projects(&mut page, &projects, None).unwrap();
        assert_eq!(outcome, SectionOutcome::Rendered { items: 2 });

        let cards = page.query_selector_all(&sel(".projects-grid > .project-card"));
        assert_eq!(cards.len(), 2);
        let alpha = cards[0];
        let img = alpha.query_selector(&sel(".project-image img")).unwrap();
        assert_eq!(img.get_attribute("loading"), Some("lazy"));
        assert_eq!(img.get_attribute("alt"), Some("alpha"));
        assert_eq!(alpha.query_selector_all(&sel(".project-link-btn")).len(), 2);
        assert_eq!(
            alpha.query_selector(&sel(".project-time")).unwrap().text_content(),
            "2023.01 - 2023.12"
        );
        let techs: Vec<_> = alpha
            .query_selector_all(&sel(".tech-tag"))
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(techs, vec!["Rust", "Tokio"]);
        assert!(cards[1].query_selector(&sel(".project-link-btn")).is_none());
    }

    #[test]
    fn test_missing_links_object_renders_no_buttons() {
        let mut page = fixtures::page();
        let mut entry = project("gamma", None, None);
        entry.links = None;
        render_projects(&mut page, &[entry], None).unwrap();
        assert!(page.query_selector(&sel(".project-link-btn")).is_none());
        assert!(page.query_selector(&sel(".project-links")).is_some());
    }
}
