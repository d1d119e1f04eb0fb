use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::api::{DEFAULT_STATUS, PostInput};
use crate::error::{GhostError, Result};

/// Raw action inputs. Every field is optional here, `into_request` decides
/// what is required for the chosen content type.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionInputs {
    pub ghost_url: Option<String>,
    pub ghost_admin_api_key: Option<String>,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_path: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
    pub excerpt: Option<String>,
    pub feature_image: Option<String>,
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("ghost_url", &self.ghost_url)
            .field(
                "ghost_admin_api_key",
                &self.ghost_admin_api_key.as_ref().map(|_| "***REDACTED***"),
            )
            .field("content_type", &self.content_type)
            .field("title", &self.title)
            .field("content", &self.content.as_ref().map(|c| c.len()))
            .field("image_path", &self.image_path)
            .field("tags", &self.tags)
            .field("status", &self.status)
            .field("excerpt", &self.excerpt)
            .field("feature_image", &self.feature_image)
            .finish()
    }
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub ghost_url: String,
    pub admin_api_key: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Post(PostInput),
    Image(PathBuf),
}

impl ActionInputs {
    /// Reads inputs the way GitHub Actions passes them: `INPUT_<NAME>`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(input_env_key(name)).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).and_then(non_empty);
        Self {
            ghost_url: get("ghost_url"),
            ghost_admin_api_key: get("ghost_admin_api_key"),
            content_type: get("content_type"),
            title: get("title"),
            content: get("content"),
            image_path: get("image_path"),
            tags: get("tags"),
            status: get("status"),
            excerpt: get("excerpt"),
            feature_image: get("feature_image"),
        }
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let raw: Self = toml::from_str(content)?;
        Ok(raw.normalized())
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read inputs file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn normalized(self) -> Self {
        let n = |v: Option<String>| v.and_then(non_empty);
        Self {
            ghost_url: n(self.ghost_url),
            ghost_admin_api_key: n(self.ghost_admin_api_key),
            content_type: n(self.content_type),
            title: n(self.title),
            content: n(self.content),
            image_path: n(self.image_path),
            tags: n(self.tags),
            status: n(self.status),
            excerpt: n(self.excerpt),
            feature_image: n(self.feature_image),
        }
    }

    /// Checks required inputs before anything touches the network.
    pub fn into_request(self) -> Result<PublishRequest> {
        let ghost_url = required(self.ghost_url, "ghost_url")?;
        let admin_api_key = required(self.ghost_admin_api_key, "ghost_admin_api_key")?;
        let content_type = required(self.content_type, "content_type")?;

        let target = match content_type.as_str() {
            "post" => {
                let title = self
                    .title
                    .ok_or_else(|| GhostError::Validation("Title is required for posts".into()))?;
                let content = self
                    .content
                    .ok_or_else(|| GhostError::Validation("Content is required for posts".into()))?;
                Target::Post(PostInput {
                    title,
                    body_html: content,
                    status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                    tags: self.tags,
                    excerpt: self.excerpt,
                    feature_image: self.feature_image,
                })
            }
            "image" => {
                let path = self.image_path.ok_or_else(|| {
                    GhostError::Validation("Image path is required for image uploads".into())
                })?;
                Target::Image(PathBuf::from(path))
            }
            _ => {
                return Err(GhostError::Validation(
                    r#"Content type must be either "post" or "image""#.into(),
                ));
            }
        };

        Ok(PublishRequest {
            ghost_url,
            admin_api_key,
            target,
        })
    }
}

fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| GhostError::Validation(format!("Input required and not supplied: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn inputs(pairs: &[(&str, &str)]) -> ActionInputs {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ActionInputs::from_lookup(|name| map.get(name).cloned())
    }

    fn validation_message(inputs: ActionInputs) -> String {
        match inputs.into_request() {
            Err(GhostError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    const BASE: &[(&str, &str)] = &[
        ("ghost_url", "https://testblog.ghost.io"),
        ("ghost_admin_api_key", "test-api-key"),
    ];

    fn with(extra: &[(&str, &str)]) -> ActionInputs {
        let mut all = BASE.to_vec();
        all.extend_from_slice(extra);
        inputs(&all)
    }

    #[test]
    fn env_keys_follow_actions_convention() {
        assert_eq!(input_env_key("ghost_url"), "INPUT_GHOST_URL");
        assert_eq!(input_env_key("feature image"), "INPUT_FEATURE_IMAGE");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let parsed = inputs(&[("title", "  "), ("tags", " news ")]);
        assert_eq!(parsed.title, None);
        assert_eq!(parsed.tags.as_deref(), Some("news"));
    }

    #[test]
    fn post_request_defaults_status_to_draft() {
        let request = with(&[
            ("content_type", "post"),
            ("title", "Hello"),
            ("content", "<p>Hi</p>"),
            ("tags", "news,update"),
        ])
        .into_request()
        .unwrap();

        let mut expected = PostInput::new("Hello", "<p>Hi</p>");
        expected.tags = Some("news,update".into());
        assert_eq!(request.ghost_url, "https://testblog.ghost.io");
        assert_eq!(request.target, Target::Post(expected));
    }

    #[test]
    fn image_request_carries_path() {
        let request = with(&[("content_type", "image"), ("image_path", "./cover.png")])
            .into_request()
            .unwrap();
        assert_eq!(request.target, Target::Image(PathBuf::from("./cover.png")));
    }

    #[test]
    fn missing_connection_inputs_are_named() {
        assert_eq!(
            validation_message(inputs(&[])),
            "Input required and not supplied: ghost_url"
        );
        assert_eq!(
            validation_message(inputs(&[("ghost_url", "https://b.io")])),
            "Input required and not supplied: ghost_admin_api_key"
        );
        assert_eq!(
            validation_message(with(&[])),
            "Input required and not supplied: content_type"
        );
    }

    #[test]
    fn post_requires_title_and_content() {
        assert_eq!(
            validation_message(with(&[("content_type", "post"), ("content", "<p>x</p>")])),
            "Title is required for posts"
        );
        assert_eq!(
            validation_message(with(&[("content_type", "post"), ("title", "Hello")])),
            "Content is required for posts"
        );
    }

    #[test]
    fn image_requires_path() {
        assert_eq!(
            validation_message(with(&[("content_type", "image")])),
            "Image path is required for image uploads"
        );
    }

    #[test]
    fn rejects_unknown_content_type() {
        assert_eq!(
            validation_message(with(&[("content_type", "page")])),
            r#"Content type must be either "post" or "image""#
        );
    }

    #[test]
    fn parses_toml_inputs() {
        let parsed = ActionInputs::from_toml_str(
            r#"
            ghost_url = "https://testblog.ghost.io/"
            ghost_admin_api_key = "test-api-key"
            content_type = "post"
            title = "Hello"
            content = "<p>Hi</p>"
            excerpt = ""
            "#,
        )
        .unwrap();

        assert_eq!(parsed.excerpt, None);
        let request = parsed.into_request().unwrap();
        assert!(matches!(request.target, Target::Post(ref p) if p.title == "Hello"));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(ActionInputs::from_toml_str(r#"ghost_uri = "typo""#).is_err());
    }

    #[test]
    fn debug_hides_api_key() {
        let rendered = format!("{:?}", with(&[]));
        assert!(!rendered.contains("test-api-key"));
    }
}
