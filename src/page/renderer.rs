//! HTML page rendering.
//!
//! # Responsibilities
//! - Parse the page template once at startup
//! - Render it per request with a fresh cache-busting token
//!
//! # Design Decisions
//! - The parsed template is immutable and shared read-only across requests
//! - Template variables: `title`, `image_path`, `timestamp`

use std::error::Error as _;
use std::fs;
use std::path::PathBuf;

use tera::{Context, Tera};
use thiserror::Error;

use crate::config::PageConfig;
use crate::http::IMAGE_PATH;
use crate::page::token::CacheBuster;

/// Registered name of the page template. The `.html` suffix turns on autoescaping.
pub const TEMPLATE_NAME: &str = "index.html";

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Errors from loading or rendering the page template.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template: {}", describe(.0))]
    Parse(#[source] tera::Error),

    #[error("failed to render template: {}", describe(.0))]
    Render(#[source] tera::Error),
}

/// Flatten a tera error and its causes into one line.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Renders the landing page.
#[derive(Debug)]
pub struct PageRenderer {
    tera: Tera,
    title: String,
}

impl PageRenderer {
    /// Build the renderer from config, reading `template_path` if set.
    pub fn from_config(config: &PageConfig) -> Result<Self, RenderError> {
        match &config.template_path {
            Some(path) => {
                let source = fs::read_to_string(path).map_err(|source| RenderError::Read {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "Loaded page template");
                Self::from_template(&source, &config.title)
            }
            None => Self::from_template(BUILTIN_TEMPLATE, &config.title),
        }
    }

    /// Build the renderer from template source.
    pub fn from_template(source: &str, title: &str) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(RenderError::Parse)?;

        Ok(Self {
            tera,
            title: title.to_string(),
        })
    }

    pub fn render(&self, token: CacheBuster) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("title", &self.title);
        context.insert("image_path", IMAGE_PATH);
        context.insert("timestamp", &token.to_string());

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(RenderError::Render)
    }
}
