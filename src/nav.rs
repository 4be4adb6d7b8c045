//! Shared navigation and footer: markup, active-link matching, scroll math.

use crate::config::{NavConfig, NavLink};
use crate::markup::{escape, safe_url};

/// Id of the injected navbar; its presence means injection already ran.
pub const NAVBAR_ID: &str = "navbar";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const HOME_PAGE: &str = "home";

fn is_root(path: &str) -> bool {
    let path = path.trim();
    path.is_empty() || path == "/" || path.ends_with("/index.html") || path == "index.html"
}

/// Strip relative prefixes (`../`, `./`) so hrefs written for nested pages
/// and root pages compare the same way.
fn normalize_href(href: &str) -> String {
    let mut rest = href.trim();
    loop {
        if let Some(r) = rest.strip_prefix("../") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else {
            break;
        }
    }
    let rest = rest.trim_start_matches('/');
    format!("/{rest}")
}

/// The single nav entry matching `path`, if any.
///
/// Root paths (`/`, `.../index.html`) select the `home` entry. Any other path
/// selects the first entry whose normalized href is a suffix of the path,
/// with or without its `.html` extension, so the site works both at the
/// domain root and under a project subdirectory.
pub fn active_link<'a>(path: &str, links: &'a [NavLink]) -> Option<&'a NavLink> {
    if is_root(path) {
        return links.iter().find(|l| l.page == HOME_PAGE);
    }
    let path = path.trim().trim_end_matches('/');
    links.iter().find(|link| {
        let href = normalize_href(&link.href);
        if href == "/" {
            return false;
        }
        let bare = href.strip_suffix(".html").unwrap_or(&href);
        path.ends_with(&href) || path.ends_with(bare)
    })
}

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Percentage of the document scrolled, clamped to `[0, 100]`.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_top / range * 100.0).clamp(0.0, 100.0)
}

fn href(url: &str) -> String {
    safe_url(url).unwrap_or_else(|| "#".into())
}

pub fn navbar_html(cfg: &NavConfig) -> String {
    let links: String = cfg
        .links
        .iter()
        .map(|l| {
            format!(
                r#"<li><a href="{}" class="{NAV_LINK_CLASS}" data-page="{}">{}</a></li>"#,
                href(&l.href),
                escape(&l.page),
                escape(&l.label),
            )
        })
        .collect();
    format!(
        r#"<nav class="navbar" id="{NAVBAR_ID}">
    <div class="container nav-content">
        <a href="/" class="logo">{brand}<span>.</span></a>
        <ul class="nav-links">{links}<li><a href="{contact}" class="nav-btn">Contact</a></li></ul>
        <div class="menu-toggle" id="menu-toggle"><i data-lucide="menu"></i></div>
    </div>
</nav>"#,
        brand = escape(&cfg.brand),
        contact = href(&cfg.contact_href),
    )
}

pub fn footer_html(cfg: &NavConfig, year: u32) -> String {
    format!(
        r#"<footer>
    <div class="container">
        <div class="footer-content">
            <div class="footer-info">
                <a href="/" class="logo">{brand}<span>.</span></a>
                <p>{blurb}</p>
            </div>
            <div class="footer-links">
                <div class="social-links">
                    <a href="{github}" target="_blank" rel="noopener" class="social-link"><i data-lucide="github"></i></a>
                    <a href="{linkedin}" class="social-link"><i data-lucide="linkedin"></i></a>
                    <a href="{twitter}" class="social-link"><i data-lucide="twitter"></i></a>
                </div>
            </div>
        </div>
        <div class="copyright"><p>&copy; {year} {owner}. Built with precision.</p></div>
    </div>
</footer>"#,
        brand = escape(&cfg.brand),
        blurb = escape(&cfg.footer_blurb),
        github = href(&cfg.github_url),
        linkedin = href(&cfg.linkedin_url),
        twitter = href(&cfg.twitter_url),
        owner = escape(&cfg.owner),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> Vec<NavLink> {
        NavConfig::default().links
    }

    fn active(path: &str) -> Option<String> {
        active_link(path, &links()).map(|l| l.page.clone())
    }

    #[test]
    fn root_paths_select_home() {
        assert_eq!(active("/").as_deref(), Some("home"));
        assert_eq!(active("/index.html").as_deref(), Some("home"));
        assert_eq!(active("/portfolio/index.html").as_deref(), Some("home"));
    }

    #[test]
    fn page_paths_select_their_entry() {
        assert_eq!(active("/pages/about.html").as_deref(), Some("about"));
        assert_eq!(active("/pages/open-source.html").as_deref(), Some("os"));
        assert_eq!(active("/me/pages/projects.html").as_deref(), Some("projects"));
        assert_eq!(active("/pages/projects").as_deref(), Some("projects"));
    }

    #[test]
    fn relative_hrefs_match_like_absolute_ones() {
        let rel = vec![
            NavLink { label: "Home".into(), href: "../index.html".into(), page: "home".into() },
            NavLink { label: "About".into(), href: "../pages/about.html".into(), page: "about".into() },
        ];
        assert_eq!(active_link("/pages/about.html", &rel).map(|l| l.page.as_str()), Some("about"));

        let cfg = NavConfig { links: rel, ..NavConfig::default() };
        let html = navbar_html(&cfg);
        assert!(html.contains(r#"<a href="../pages/about.html" class="nav-link" data-page="about">"#));
        assert!(html.contains(r#"<a href="../index.html" class="nav-link" data-page="home">"#));
    }

    #[test]
    fn unknown_path_selects_nothing() {
        assert_eq!(active("/pages/contact.html"), None);
    }

    #[test]
    fn scroll_threshold_is_strict() {
        assert!(!is_scrolled(50.0, 50.0));
        assert!(is_scrolled(50.5, 50.0));
    }

    #[test]
    fn progress_handles_short_documents() {
        assert_eq!(scroll_progress(0.0, 500.0, 800.0), 0.0);
        assert_eq!(scroll_progress(250.0, 1300.0, 800.0), 50.0);
        assert_eq!(scroll_progress(900.0, 1300.0, 800.0), 100.0);
    }

    #[test]
    fn navbar_lists_every_link_once() {
        let html = navbar_html(&NavConfig::default());
        assert_eq!(html.matches("class=\"nav-link\"").count(), 4);
        assert_eq!(html.matches("id=\"navbar\"").count(), 1);
        assert!(html.contains(r#"data-page="about""#));
    }

    #[test]
    fn footer_carries_the_year() {
        let html = footer_html(&NavConfig::default(), 2026);
        assert!(html.contains("&copy; 2026 Devansh."));
        assert!(html.starts_with("<footer>"));
    }
}
