//! Static page generation
//!
//! Renders the catalog as nested sections: every branch becomes a
//! `<div class="section levelN">` with an `hN` heading, every leaf a card
//! fragment from the `card` template.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, ProgressObserver};
use crate::domain::{Card, Catalog, Node, Section};
use crate::infrastructure::traits::{FileSystem, TemplateRenderer};

/// Name of the generated page inside the web directory.
pub const INDEX_FILE: &str = "index.html";

pub const HEADER_TEMPLATE: &str = "index.header";
pub const FOOTER_TEMPLATE: &str = "index.footer";
pub const CARD_TEMPLATE: &str = "card";

/// Builds the HTML page from a catalog.
pub struct PageBuilder {
    renderer: Arc<dyn TemplateRenderer>,
    fs: Arc<dyn FileSystem>,
    observer: Arc<dyn ProgressObserver>,
}

impl PageBuilder {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        fs: Arc<dyn FileSystem>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            renderer,
            fs,
            observer,
        }
    }

    /// Header, body and footer as one string.
    pub fn build(&self, catalog: &Catalog) -> ApplicationResult<String> {
        debug!("PageBuilder.build()");
        let empty = Value::Mapping(Mapping::new());
        let header = self.render(HEADER_TEMPLATE, &empty)?;
        let body = self.build_body(catalog.root(), 1)?;
        let footer = self.render(FOOTER_TEMPLATE, &empty)?;
        Ok(header + &body + &footer)
    }

    /// Markup for the children of `section`, in document order.
    ///
    /// `level` is the nesting depth of those children (1 = top-level).
    pub fn build_body(&self, section: &Section, level: usize) -> ApplicationResult<String> {
        let indent = " ".repeat(2 * (level + 1));
        let mut out = String::new();

        for (name, node) in section.iter() {
            match node {
                Node::Absent => {}
                Node::Leaf(card) => {
                    let html = self.render_card(name, card)?;
                    out.push_str(&indent_fragment(&html, &indent));
                    out.push('\n');
                }
                Node::Branch(child) => {
                    self.observer.section_rendered(name, level);
                    let heading = format!("h{level}");
                    out.push_str(&format!(
                        "{indent}<div class=\"section level{level}\">\n"
                    ));
                    out.push_str(&format!(
                        "{indent}  <{heading}>{}</{heading}>\n",
                        tera::escape_html(name)
                    ));
                    out.push_str(&format!("{indent}  <ul>\n"));
                    out.push_str(&self.build_body(child, level + 1)?);
                    out.push_str(&format!("{indent}  </ul>\n"));
                    out.push_str(&format!("{indent}</div>\n"));
                }
            }
        }

        Ok(out)
    }

    /// Build the page and write `<web_dir>/index.html`.
    ///
    /// Nothing is written unless the whole page rendered.
    pub fn write_index(&self, catalog: &Catalog, web_dir: &Path) -> ApplicationResult<PathBuf> {
        let html = self.build(catalog)?;

        self.fs
            .create_dir_all(web_dir)
            .with_path_context("create web directory", web_dir)?;
        let outfile = web_dir.join(INDEX_FILE);
        self.fs
            .write(&outfile, &html)
            .with_path_context("write page", &outfile)?;

        self.observer
            .page_written(&outfile, catalog.root().card_count());
        Ok(outfile)
    }

    fn render_card(&self, label: &str, card: &Card) -> ApplicationResult<String> {
        let mut data = Mapping::new();
        data.insert("label".into(), label.into());
        data.insert("card".into(), Value::Mapping(card.template_mapping()));
        self.render(CARD_TEMPLATE, &Value::Mapping(data))
    }

    fn render(&self, name: &str, data: &Value) -> ApplicationResult<String> {
        self.renderer
            .render(name, data)
            .map_err(|message| ApplicationError::Template {
                name: name.to_string(),
                message,
            })
    }
}

/// Prefix every line of `html` with `indent`, dropping trailing whitespace.
fn indent_fragment(html: &str, indent: &str) -> String {
    let nested = html.replace('\n', &format!("\n{indent}"));
    format!("{indent}{}", nested.trim_end())
}
