use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;

/// A starred repository as reported by the hosting API.
///
/// Only the fields the sync loop needs: the name doubles as the local
/// directory name, the clone URL feeds `git clone`, and the pushed-at
/// timestamp drives the staleness check.
#[derive(Debug, Clone, Serialize)]
pub struct StarredRepo {
    pub name: String,
    pub clone_url: String,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Source of the authenticated user's starred repositories.
///
/// The sync engine only depends on this trait, so tests can substitute a
/// canned listing and other hosting providers can be added behind it.
#[async_trait]
pub trait StarSource: Send + Sync {
    /// List every starred repository, in API-delivered order.
    async fn list_starred(&self) -> Result<Vec<StarredRepo>>;
}

/// GitHub-backed [`StarSource`] with token authentication.
pub struct StarClient {
    client: Octocrab,
    page_size: u8,
}

impl StarClient {
    /// Create a client from the configured token.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self {
            client,
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl StarSource for StarClient {
    async fn list_starred(&self) -> Result<Vec<StarredRepo>> {
        debug!("Fetching starred repositories");

        let mut repositories = Vec::new();
        let mut page: u8 = 1;

        loop {
            let starred = self
                .client
                .current()
                .list_repos_starred_by_authenticated_user()
                .per_page(self.page_size)
                .page(page)
                .send()
                .await
                .with_context(|| format!("Failed to fetch starred repositories page {}", page))?;

            let last_page = starred.next.is_none();

            repositories.extend(starred.items.into_iter().filter_map(to_starred));

            if last_page {
                break;
            }
            page += 1;
        }

        debug!("Found {} starred repositories", repositories.len());
        Ok(repositories)
    }
}

/// Convert an API repository entry into a [`StarredRepo`].
///
/// Entries without a clone URL cannot be mirrored and are dropped with a
/// warning.
fn to_starred(repo: octocrab::models::Repository) -> Option<StarredRepo> {
    let Some(clone_url) = repo.clone_url.as_ref().map(|url| url.to_string()) else {
        warn!("Starred repository {} has no clone URL, skipping", repo.name);
        return None;
    };

    Some(StarredRepo {
        clone_url,
        pushed_at: repo.pushed_at,
        name: repo.name,
    })
}
