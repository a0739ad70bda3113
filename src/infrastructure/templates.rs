//! Template renderer backed by Tera
//!
//! Templates are the `*.html` files directly inside the template directory.
//! Logical names drop the extension: `card` renders `card.html`.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::infrastructure::traits::TemplateRenderer;
use crate::infrastructure::{InfraError, InfraResult};

const TEMPLATE_EXTENSION: &str = "html";

/// Real renderer over a directory of Tera templates.
#[derive(Debug)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Load every `*.html` file in `template_dir`.
    ///
    /// Fails with [`InfraError::NoTemplates`] if there are none.
    pub fn new(template_dir: &Path) -> InfraResult<Self> {
        let files = list_templates(template_dir);
        if files.is_empty() {
            return Err(InfraError::NoTemplates(template_dir.to_path_buf()));
        }
        debug!("Loading {} templates from {}", files.len(), template_dir.display());

        let named = files.iter().map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (path.as_path(), Some(name))
        });

        let mut tera = Tera::default();
        tera.add_template_files(named)
            .map_err(|e| InfraError::Template {
                message: error_chain(&e),
            })?;
        // Fragments are emitted verbatim, like hand-written HTML.
        tera.autoescape_on(vec![]);

        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, name: &str, data: &Value) -> Result<String, String> {
        let file = format!("{name}.{TEMPLATE_EXTENSION}");
        let context = Context::from_serialize(data).map_err(|e| error_chain(&e))?;
        self.tera.render(&file, &context).map_err(|e| error_chain(&e))
    }
}

/// `*.html` files directly inside `dir`, sorted by name.
fn list_templates(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext == TEMPLATE_EXTENSION)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
