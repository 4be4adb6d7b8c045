//! Fetch the GitHub profile and repositories and fill their mounts. The
//! profile and the project list fail independently; a failure leaves that
//! section empty and is only logged.

use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, Window};

use super::dom;
use super::mounts::Mounts;
use crate::config::GitHubConfig;
use crate::error::{Result, SiteError};
use crate::github::{self, Profile, Repo, RepoPlan};

const ACCEPT: &str = "application/vnd.github+json";
const CARD_CLASS: &str = "project-card reveal";

async fn get(url: &str) -> Result<String> {
    let fail = |reason: String| SiteError::Fetch { url: url.to_string(), reason };
    let response = Request::get(url)
        .header("Accept", ACCEPT)
        .send()
        .await
        .map_err(|e| fail(e.to_string()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }
    response.text().await.map_err(|e| fail(e.to_string()))
}

async fn fetch_profile(cfg: &GitHubConfig) -> Result<Profile> {
    let body = get(&github::profile_url(&cfg.api_base, &cfg.username)).await?;
    github::decode_profile(&body)
}

async fn fetch_repos(cfg: &GitHubConfig) -> Result<Vec<Repo>> {
    let repos = match cfg.repos.plan(&cfg.api_base, &cfg.username) {
        RepoPlan::List(url) => github::decode_repos(&get(&url).await?)?,
        RepoPlan::Each(urls) => {
            // One missing repository should not hide the others.
            let mut repos = Vec::with_capacity(urls.len());
            for url in urls {
                match get(&url).await.and_then(|body| github::decode_repo(&body)) {
                    Ok(repo) => repos.push(repo),
                    Err(e) => log::error!("github: {e}"),
                }
            }
            repos
        }
    };
    Ok(github::visible_repos(repos, &cfg.username))
}

fn show_profile(window: &Window, mounts: &Mounts, profile: &Profile) {
    if let Some(document) = window.document() {
        for (id, text) in github::profile_stats(profile) {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(&text));
            }
        }
    }
    if let Some(card) = &mounts.profile {
        card.set_inner_html(&github::profile_card_html(profile));
    }
}

fn show_repos(window: &Window, container: &HtmlElement, repos: &[Repo]) -> Result<()> {
    let document = window.document().ok_or(SiteError::MissingMount("document"))?;
    container.set_inner_html("");
    for repo in repos {
        let card = document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| SiteError::Js("div is not an HtmlElement".into()))?;
        card.set_class_name(CARD_CLASS);
        let style = card.style();
        style.set_property("display", "flex")?;
        style.set_property("flex-direction", "column")?;
        style.set_property("height", "100%")?;
        card.set_inner_html(&github::repo_card_html(repo));
        container.append_child(&card)?;
    }
    Ok(())
}

/// Fill the profile card and stat counters, or log and leave them as they
/// are when the profile could not be loaded.
pub fn render_profile(window: &Window, mounts: &Mounts, profile: Result<Profile>) {
    match profile {
        Ok(profile) => show_profile(window, mounts, &profile),
        Err(e) => log::error!("github profile: {e}"),
    }
}

/// Replace the project cards, or log and leave the container untouched when
/// the repositories could not be loaded.
pub fn render_repos(window: &Window, container: &HtmlElement, repos: Result<Vec<Repo>>) {
    let shown = repos.and_then(|repos| {
        log::info!("github: rendering {} repositories", repos.len());
        show_repos(window, container, &repos)
    });
    if let Err(e) = shown {
        log::error!("github repos: {e}");
    }
}

/// Load both sections once. Never fails and never retries; errors end up
/// in the console.
pub async fn load(window: Window, cfg: GitHubConfig, mounts: Mounts) {
    let wants_profile = mounts.profile.is_some()
        || window
            .document()
            .is_some_and(|d| github::STAT_IDS.iter().any(|id| d.get_element_by_id(id).is_some()));
    if wants_profile {
        render_profile(&window, &mounts, fetch_profile(&cfg).await);
    }

    if let Some(container) = &mounts.projects {
        render_repos(&window, container, fetch_repos(&cfg).await);
    }

    dom::refresh_icons(&window);
}
