use tracing::debug;

use super::SectionOutcome;
use crate::dom::{DomNode, Selector};
use crate::models::resume::present;
use crate::models::PersonalInfo;
use crate::render::RenderError;

const AVATAR: &str = ".hero-avatar img";
const NAME: &str = ".hero-name";
const TITLE: &str = ".hero-title";
const INTRO: &str = ".hero-intro";
const EMAIL_LINK: &str = r#".hero-contacts a[href^="mailto"]"#;
const GITHUB_LINK: &str = r#".hero-contacts a[href*="github"]"#;
const LINKEDIN_LINK: &str = r#".hero-contacts a[href*="linkedin"]"#;

/// Updates the hero section in place. Only fields present in `personal` overwrite markup;
/// contact links are matched by purpose, so their order in the page does not matter.
pub fn render_personal(
    page: &mut DomNode,
    personal: &PersonalInfo,
) -> Result<SectionOutcome, RenderError> {
    let mut hero_found = false;
    let mut written = 0;

    let mut apply = |selector: &str,
                     value: Option<&str>,
                     write: &dyn Fn(&mut DomNode, &str)|
     -> Result<(), RenderError> {
        let selector = Selector::parse(selector)?;
        if let Some(element) = page.query_selector_mut(&selector) {
            hero_found = true;
            if let Some(value) = value {
                write(element, value);
                written += 1;
            }
        }
        Ok(())
    };

    let name = present(&personal.name);
    apply(AVATAR, present(&personal.avatar), &|img: &mut DomNode, src: &str| {
        img.set_attribute("src", src);
        img.set_attribute("alt", format!("{}的头像", name.unwrap_or_default()));
    })?;
    let set_text = |el: &mut DomNode, text: &str| el.set_text_content(text);
    apply(NAME, name, &set_text)?;
    apply(TITLE, present(&personal.title), &set_text)?;
    apply(INTRO, present(&personal.intro), &set_text)?;

    if let Some(contacts) = &personal.contacts {
        let set_href = |el: &mut DomNode, href: &str| el.set_attribute("href", href);
        let email = present(&contacts.email).map(|e| format!("mailto:{e}"));
        apply(EMAIL_LINK, email.as_deref(), &set_href)?;
        apply(GITHUB_LINK, present(&contacts.github), &set_href)?;
        apply(LINKEDIN_LINK, present(&contacts.linkedin), &set_href)?;
    }

    if !hero_found {
        debug!("No hero elements found; personal info not rendered");
        return Ok(SectionOutcome::MissingContainer);
    }
    Ok(SectionOutcome::Rendered { items: written })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contacts;
    use crate::render::sections::fixtures;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn href(page: &DomNode, selector: &str) -> String {
        page.query_selector(&sel(selector))
            .and_then(|a| a.get_attribute("href"))
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_updates_hero_fields() {
        let mut page = fixtures::page();
        let personal = PersonalInfo {
            name: Some("李四".into()),
            title: Some("Systems Engineer".into()),
            intro: Some("Builds things".into()),
            avatar: Some("images/me.jpg".into()),
            contacts: None,
        };
        let outcome = render_personal(&mut page, &personal).unwrap();
        assert_eq!(outcome, SectionOutcome::Rendered { items: 4 });

        let img = page.query_selector(&sel(".hero-avatar img")).unwrap();
        assert_eq!(img.get_attribute("src"), Some("images/me.jpg"));
        assert_eq!(img.get_attribute("alt"), Some("李四的头像"));
        assert_eq!(
            page.query_selector(&sel(".hero-name")).unwrap().text_content(),
            "李四"
        );
        assert_eq!(
            page.query_selector(&sel(".hero-intro")).unwrap().text_content(),
            "Builds things"
        );
    }

    #[test]
    fn test_missing_linkedin_leaves_static_href() {
        let mut page = fixtures::page();
        let personal = PersonalInfo {
            contacts: Some(Contacts {
                email: Some("me@example.com".into()),
                github: Some("https://github.com/me".into()),
                linkedin: None,
            }),
            ..Default::default()
        };
        render_personal(&mut page, &personal).unwrap();
        assert_eq!(href(&page, "a[href^=\"mailto\"]"), "mailto:me@example.com");
        assert_eq!(href(&page, "a[href*=\"github\"]"), "https://github.com/me");
        assert_eq!(
            href(&page, "a[href*=\"linkedin\"]"),
            "https://www.linkedin.com/in/static"
        );
    }

    #[test]
    fn test_absent_fields_leave_markup() {
        let mut page = fixtures::page();
        let before = page.clone();
        let outcome = render_personal(&mut page, &PersonalInfo::default()).unwrap();
        assert_eq!(outcome, SectionOutcome::Rendered { items: 0 });
        assert_eq!(page, before);
    }

    #[test]
    fn test_page_without_hero() {
        let mut page = crate::dom::parse_html("<body></body>").unwrap();
        let personal = PersonalInfo {
            name: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(
            render_personal(&mut page, &personal).unwrap(),
            SectionOutcome::MissingContainer
        );
    }
}
