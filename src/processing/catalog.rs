//! Job role catalog
//!
//! The catalog file is a JSON array of `{"id", "title", "desc"}` objects.
//! `desc` is optional and `id` is derived from the title when absent.

use crate::error::{Result, ScreenerError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(rename = "desc", default)]
    pub description: String,
}

impl Role {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Immutable set of roles, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// Build a catalog, rejecting empty lists and duplicate ids
    pub fn new(mut roles: Vec<Role>) -> Result<Self> {
        if roles.is_empty() {
            return Err(ScreenerError::Catalog("catalog contains no roles".to_string()));
        }

        let mut seen = HashSet::new();
        for role in &mut roles {
            if role.id.trim().is_empty() {
                role.id = slugify(&role.title);
            }
            if !seen.insert(role.id.clone()) {
                return Err(ScreenerError::Catalog(format!("duplicate role id '{}'", role.id)));
            }
        }

        Ok(Self { roles })
    }

    pub fn default_roles() -> Self {
        Self {
            roles: vec![
                Role::new(
                    "data_scientist",
                    "Data Scientist",
                    "Python, ML, pandas, scikit-learn, statistics",
                ),
                Role::new(
                    "web_developer",
                    "Web Developer",
                    "HTML, CSS, JavaScript, React, Node.js",
                ),
                Role::new(
                    "marketing_executive",
                    "Marketing Executive",
                    "SEO, content, social media, analytics",
                ),
                Role::new(
                    "devops_engineer",
                    "DevOps Engineer",
                    "AWS, Docker, Kubernetes, CI/CD",
                ),
                Role::new(
                    "nlp_engineer",
                    "NLP Engineer",
                    "Transformers, NLP, PyTorch, text processing",
                ),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let roles: Vec<Role> = serde_json::from_str(json)
            .map_err(|e| ScreenerError::Catalog(format!("malformed catalog JSON: {}", e)))?;
        Self::new(roles)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load the catalog file, falling back to the built-in roles on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No role catalog at {}, using built-in roles", path.display());
            return Self::default_roles();
        }

        match Self::from_file(path) {
            Ok(catalog) => {
                info!("Loaded {} roles from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                warn!("Ignoring role catalog {}: {}. Using built-in roles", path.display(), e);
                Self::default_roles()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.roles)?)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}
