//! Light/dark theme: resolved per request from the saved preference cookie or the client's
//! color-scheme hint, then applied to the page before it is served.

use std::fmt;
use std::str::FromStr;

use crate::dom::{DomNode, Selector};

/// Cookie holding the saved preference. This is the only state the site persists.
pub const THEME_KEY: &str = "theme-preference";
pub const DARK_MODE_CLASS: &str = "dark-mode";
/// Client hint header carrying `prefers-color-scheme`.
pub const PREFERS_COLOR_SCHEME_HEADER: &str = "sec-ch-prefers-color-scheme";

const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemeManager;

impl ThemeManager {
    pub fn new() -> Self {
        Self
    }

    /// Saved preference first, then the system preference hint, then light.
    pub fn resolve(&self, cookie_header: Option<&str>, color_scheme_hint: Option<&str>) -> Theme {
        if let Some(saved) = cookie_header.and_then(saved_preference) {
            return saved;
        }
        match color_scheme_hint.map(|h| h.trim().trim_matches('"').to_ascii_lowercase()) {
            Some(hint) if hint == "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggle(&self, current: Theme) -> Theme {
        match current {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Headers for themed pages. They ask the browser to send its color-scheme preference (and to
    /// retry the first request with it), and mark the response as varying with it.
    pub fn hint_headers(&self) -> [(&'static str, &'static str); 3] {
        [
            ("accept-ch", "Sec-CH-Prefers-Color-Scheme"),
            ("critical-ch", "Sec-CH-Prefers-Color-Scheme"),
            ("vary", "Sec-CH-Prefers-Color-Scheme, Cookie"),
        ]
    }

    /// `Set-Cookie` value persisting `theme`.
    pub fn preference_cookie(&self, theme: Theme) -> String {
        format!("{THEME_KEY}={theme}; Path=/; Max-Age={ONE_YEAR_SECS}; SameSite=Lax")
    }

    /// Marks the root element and updates the toggle button, if the page has one.
    pub fn apply(&self, page: &mut DomNode, theme: Theme) {
        if let Ok(root) = Selector::parse("html") {
            if let Some(html) = page.query_selector_mut(&root) {
                match theme {
                    Theme::Dark => html.add_class(DARK_MODE_CLASS),
                    Theme::Light => html.remove_class(DARK_MODE_CLASS),
                }
            }
        }

        let Ok(toggle_selector) = Selector::parse("#themeToggle") else {
            return;
        };
        let Some(toggle) = page.query_selector_mut(&toggle_selector) else {
            return;
        };
        let (label, sun, moon) = match theme {
            Theme::Dark => ("切换到浅色模式", "none", "block"),
            Theme::Light => ("切换到深色模式", "block", "none"),
        };
        toggle.set_attribute("aria-label", label);
        for (icon, display) in [(".sun-icon", sun), (".moon-icon", moon)] {
            if let Ok(selector) = Selector::parse(icon) {
                if let Some(el) = toggle.query_selector_mut(&selector) {
                    el.set_attribute("style", format!("display: {display}"));
                }
            }
        }
    }
}

fn saved_preference(cookie_header: &str) -> Option<Theme> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == THEME_KEY)
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const PAGE: &str = r#"<html class="js"><body>
        <button id="themeToggle"><svg class="sun-icon"></svg><svg class="moon-icon"></svg></button>
    </body></html>"#;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_saved_preference_wins_over_hint() {
        let themes = ThemeManager::new();
        assert_eq!(
            themes.resolve(Some("a=1; theme-preference=light"), Some("dark")),
            Theme::Light
        );
        assert_eq!(themes.resolve(Some("theme-preference=dark"), None), Theme::Dark);
    }

    #[test]
    fn test_hint_then_default() {
        let themes = ThemeManager::new();
        assert_eq!(themes.resolve(None, Some("\"dark\"")), Theme::Dark);
        assert_eq!(themes.resolve(Some("theme-preference=purple"), Some("light")), Theme::Light);
        assert_eq!(themes.resolve(None, None), Theme::Light);
    }

    #[test]
    fn test_apply_dark_then_light() {
        let themes = ThemeManager::new();
        let mut page = parse_html(PAGE).unwrap();

        themes.apply(&mut page, Theme::Dark);
        let html = page.query_selector(&sel("html")).unwrap();
        assert_eq!(html.get_attribute("class"), Some("js dark-mode"));
        let toggle = page.query_selector(&sel("#themeToggle")).unwrap();
        assert_eq!(toggle.get_attribute("aria-label"), Some("切换到浅色模式"));
        assert_eq!(
            toggle.query_selector(&sel(".moon-icon")).unwrap().get_attribute("style"),
            Some("display: block")
        );

        themes.apply(&mut page, Theme::Light);
        assert!(!page.query_selector(&sel("html")).unwrap().has_class(DARK_MODE_CLASS));
        assert_eq!(
            page.query_selector(&sel(".sun-icon")).unwrap().get_attribute("style"),
            Some("display: block")
        );
    }

    #[test]
    fn test_hint_headers_name_the_resolution_inputs() {
        let headers = ThemeManager::new().hint_headers();
        let (_, accept) = headers.iter().find(|(name, _)| *name == "accept-ch").unwrap();
        assert!(accept.eq_ignore_ascii_case(PREFERS_COLOR_SCHEME_HEADER));
        let (_, vary) = headers.iter().find(|(name, _)| *name == "vary").unwrap();
        assert!(vary.to_ascii_lowercase().contains(PREFERS_COLOR_SCHEME_HEADER));
        assert!(vary.contains("Cookie"));
    }

    #[test]
    fn test_toggle_and_cookie() {
        let themes = ThemeManager::new();
        assert_eq!(themes.toggle(Theme::Light), Theme::Dark);
        assert_eq!(
            themes.preference_cookie(Theme::Dark),
            "theme-preference=dark; Path=/; Max-Age=31536000; SameSite=Lax"
        );
    }
}
