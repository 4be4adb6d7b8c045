//! GitHub profile and repository data: wire models, request URLs, card
//! markup. The fetch itself lives in `wasm::github`.

use serde::Deserialize;

use crate::error::Result;
use crate::markup::{escape, safe_url};

pub const DEFAULT_BIO: &str = "Building the future.";
pub const DEFAULT_LANGUAGE: &str = "Software";

/// Subset of `GET /users/{user}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or(self.login.as_str())
    }

    pub fn display_bio(&self) -> &str {
        non_empty(self.bio.as_deref()).unwrap_or(DEFAULT_BIO)
    }
}

/// Subset of a repository object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl Repo {
    pub fn live_url(&self) -> Option<&str> {
        non_empty(self.homepage.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Which repositories the projects section shows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepoSource {
    /// One paged listing of the user's repositories.
    Listing {
        #[serde(default = "default_sort")]
        sort: String,
        #[serde(default = "default_direction")]
        direction: String,
        #[serde(default = "default_per_page")]
        per_page: u32,
    },
    /// A fixed list of repositories, each fetched on its own.
    Named {
        #[serde(default)]
        names: Vec<String>,
    },
}

fn default_sort() -> String {
    "created".into()
}

fn default_direction() -> String {
    "asc".into()
}

fn default_per_page() -> u32 {
    10
}

impl Default for RepoSource {
    fn default() -> Self {
        RepoSource::Listing {
            sort: default_sort(),
            direction: default_direction(),
            per_page: default_per_page(),
        }
    }
}

/// Requests needed to load the configured repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoPlan {
    /// A single request answering with an array.
    List(String),
    /// One request per repository, each answering with an object.
    Each(Vec<String>),
}

fn trim_base(api_base: &str) -> &str {
    api_base.trim_end_matches('/')
}

pub fn profile_url(api_base: &str, user: &str) -> String {
    format!("{}/users/{user}", trim_base(api_base))
}

impl RepoSource {
    pub fn plan(&self, api_base: &str, user: &str) -> RepoPlan {
        let base = trim_base(api_base);
        match self {
            RepoSource::Listing { sort, direction, per_page } => RepoPlan::List(format!(
                "{base}/users/{user}/repos?sort={sort}&direction={direction}&per_page={per_page}"
            )),
            RepoSource::Named { names } => RepoPlan::Each(
                names.iter().map(|n| format!("{base}/repos/{user}/{n}")).collect(),
            ),
        }
    }
}

pub fn decode_profile(body: &str) -> Result<Profile> {
    Ok(serde_json::from_str(body)?)
}

pub fn decode_repos(body: &str) -> Result<Vec<Repo>> {
    Ok(serde_json::from_str(body)?)
}

pub fn decode_repo(body: &str) -> Result<Repo> {
    Ok(serde_json::from_str(body)?)
}

/// Drop the profile-README repository (named after the user).
pub fn visible_repos(repos: Vec<Repo>, user: &str) -> Vec<Repo> {
    repos.into_iter().filter(|r| !r.name.eq_ignore_ascii_case(user)).collect()
}

/// Element ids of the stat counters, repos first then followers.
pub const STAT_IDS: [&str; 4] = ["repo-count", "follower-count", "gh-public-repos", "gh-followers"];

/// Stat counters filled from the profile: `(element id, text)`.
pub fn profile_stats(profile: &Profile) -> [(&'static str, String); 4] {
    let repos = profile.public_repos.to_string();
    let followers = profile.followers.to_string();
    [
        (STAT_IDS[0], repos.clone()),
        (STAT_IDS[1], followers.clone()),
        (STAT_IDS[2], repos),
        (STAT_IDS[3], followers),
    ]
}

pub fn profile_card_html(profile: &Profile) -> String {
    let name = escape(profile.display_name());
    let avatar = safe_url(&profile.avatar_url)
        .map(|src| format!(r#"<img src="{src}" alt="{name}" class="gh-avatar">"#))
        .unwrap_or_default();
    let link = safe_url(&profile.html_url)
        .map(|href| {
            format!(
                r#"<div class="gh-link"><a href="{href}" target="_blank" rel="noopener" class="secondary-btn">View Profile <i data-lucide="external-link"></i></a></div>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"{avatar}<div class="gh-info"><h3>{name}</h3><p class="mono">{bio}</p>{link}</div>"#,
        bio = escape(profile.display_bio()),
    )
}

/// Inner markup of one project card.
pub fn repo_card_html(repo: &Repo) -> String {
    let language = escape(non_empty(repo.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE));
    let name = escape(&repo.name);
    let desc = escape(non_empty(repo.description.as_deref()).unwrap_or(repo.name.as_str()));

    let mut actions = String::new();
    if let Some(href) = safe_url(&repo.html_url) {
        actions.push_str(&format!(
            r#"<a href="{href}" target="_blank" rel="noopener" class="btn-icon" aria-label="Source"><i data-lucide="github"></i></a>"#
        ));
    }
    if let Some(href) = repo.live_url().and_then(safe_url) {
        actions.push_str(&format!(
            r#"<a href="{href}" target="_blank" rel="noopener" class="btn-icon" aria-label="Live"><i data-lucide="external-link"></i></a>"#
        ));
    }

    format!(
        r#"<div class="project-header"><span class="project-category mono">{language}</span><h3 class="project-name">{name}</h3></div><p class="project-desc">{desc}</p><div class="project-meta mono"><span><i data-lucide="star"></i> {stars}</span><span><i data-lucide="git-fork"></i> {forks}</span></div><div class="project-actions">{actions}</div>"#,
        stars = repo.stargazers_count,
        forks = repo.forks_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"{
        "login": "octo", "name": null, "bio": "", "avatar_url": "https://x/a.png",
        "html_url": "https://github.com/octo", "public_repos": 12, "followers": 3,
        "plan": { "name": "free" }
    }"#;

    #[test]
    fn profile_falls_back_to_login_and_default_bio() {
        let p = decode_profile(PROFILE).unwrap();
        assert_eq!(p.display_name(), "octo");
        assert_eq!(p.display_bio(), DEFAULT_BIO);
        let html = profile_card_html(&p);
        assert!(html.contains("<h3>octo</h3>"));
        assert!(html.contains("View Profile"));
    }

    #[test]
    fn stats_render_counts() {
        let p = decode_profile(PROFILE).unwrap();
        let stats = profile_stats(&p);
        assert_eq!(stats[0], ("repo-count", "12".to_string()));
        assert_eq!(stats[3], ("gh-followers", "3".to_string()));
    }

    #[test]
    fn listing_plan_builds_query() {
        let plan = RepoSource::default().plan("https://api.github.com/", "octo");
        assert_eq!(
            plan,
            RepoPlan::List("https://api.github.com/users/octo/repos?sort=created&direction=asc&per_page=10".into())
        );
    }

    #[test]
    fn named_plan_builds_one_url_per_repo() {
        let src = RepoSource::Named { names: vec!["a".into(), "b".into()] };
        let RepoPlan::Each(urls) = src.plan("https://api.github.com", "octo") else {
            panic!("expected per-repo plan");
        };
        assert_eq!(urls, ["https://api.github.com/repos/octo/a", "https://api.github.com/repos/octo/b"]);
    }

    #[test]
    fn card_omits_live_link_without_homepage() {
        let repos = decode_repos(r#"[{ "name": "kernel", "html_url": "https://github.com/octo/kernel", "language": null }]"#).unwrap();
        let html = repo_card_html(&repos[0]);
        assert!(!html.contains("external-link"));
        assert!(html.contains(DEFAULT_LANGUAGE));
        assert!(html.contains(r#"<p class="project-desc">kernel</p>"#));
    }

    #[test]
    fn empty_homepage_counts_as_missing() {
        let repo = decode_repo(r#"{ "name": "x", "homepage": "  " }"#).unwrap();
        assert_eq!(repo.live_url(), None);
        assert!(!repo_card_html(&repo).contains("aria-label=\"Live\""));
    }

    #[test]
    fn card_shows_live_link_and_escapes_text() {
        let repo = Repo {
            name: "a<b".into(),
            description: Some("fast & small".into()),
            language: Some("Rust".into()),
            stargazers_count: 7,
            forks_count: 1,
            html_url: "https://github.com/octo/ab".into(),
            homepage: Some("https://ab.dev".into()),
        };
        let html = repo_card_html(&repo);
        assert!(html.contains(r#"href="https://ab.dev""#));
        assert!(html.contains("a&lt;b"));
        assert!(html.contains("fast &amp; small"));
        assert!(html.contains("</i> 7</span>"));
    }

    #[test]
    fn profile_repo_is_hidden() {
        let repos = vec![
            Repo { name: "Octo".into(), ..decode_repo(r#"{"name":"x"}"#).unwrap() },
            decode_repo(r#"{"name":"tool"}"#).unwrap(),
        ];
        let shown = visible_repos(repos, "octo");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "tool");
    }

    #[test]
    fn partial_listing_keeps_other_defaults() {
        let src: RepoSource = serde_json::from_str(r#"{ "kind": "listing", "per_page": 5 }"#).unwrap();
        assert_eq!(
            src,
            RepoSource::Listing { sort: "created".into(), direction: "asc".into(), per_page: 5 }
        );
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(decode_repos("{}").is_err());
    }
}
