//! Structured message layout rendered to HTML and to plain text.
//!
//! Both bodies come from the same [`Document`] value fed to two Handlebars
//! templates, so an email's text and HTML parts always carry the same
//! information. The HTML registry escapes every value; the text registry
//! does not.

use std::sync::LazyLock;

use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

const DOCUMENT: &str = "document";

const HTML_TEMPLATE: &str = concat!(
    "<html><body style=\"margin:0;padding:0;font-family:'Segoe UI',Tahoma,sans-serif;",
    "background-color:#0B0D17;color:#FFFFFF;\">",
    "<div style=\"max-width:600px;margin:0 auto;padding:40px;\">",
    "<div style=\"text-align:center;margin-bottom:30px;\">",
    "<h1 style=\"color:#C5A059;font-size:24px;letter-spacing:2px;margin:0;\">{{banner}}</h1>",
    "{{#if tagline}}<p style=\"color:#A0A0A0;font-size:12px;letter-spacing:4px;",
    "text-transform:uppercase;\">{{tagline}}</p>{{/if}}",
    "</div>",
    "<h2 style=\"color:#C5A059;font-size:20px;\">{{heading}}</h2>",
    "{{#each blocks}}",
    "{{#if paragraph}}<p style=\"font-size:16px;line-height:1.6;\">{{paragraph}}</p>{{/if}}",
    "{{#if fields}}<h3 style=\"color:#C5A059;font-size:16px;\">{{fields.title}}</h3>",
    "<table style=\"width:100%;border-collapse:collapse;\">",
    "{{#each fields.rows}}<tr><td style=\"padding:10px 0;color:#A0A0A0;width:150px;\">{{label}}:</td>",
    "<td style=\"padding:10px 0;font-weight:bold;\">{{value}}</td></tr>{{/each}}",
    "</table>{{/if}}",
    "{{#if section}}<h3 style=\"color:#C5A059;font-size:14px;\">{{section.title}}:</h3>",
    "<p style=\"font-style:italic;padding:15px;\">{{section.body}}</p>{{/if}}",
    "{{#if badge}}<div style=\"display:inline-block;padding:15px 30px;border:1px solid #C5A059;",
    "color:#C5A059;text-transform:uppercase;font-size:12px;\">{{badge}}</div>{{/if}}",
    "{{/each}}",
    "<div style=\"text-align:center;margin-top:40px;color:#A0A0A0;font-size:12px;\">",
    "{{#each footer}}<p>{{this}}</p>{{/each}}",
    "</div></div></body></html>",
);

const TEXT_TEMPLATE: &str = concat!(
    "{{banner}}\n",
    "{{#if tagline}}{{tagline}}\n{{/if}}",
    "\n{{heading}}\n",
    "{{#each blocks}}",
    "{{#if paragraph}}\n{{paragraph}}\n{{/if}}",
    "{{#if fields}}\n{{fields.title}}\n",
    "{{#each fields.rows}}{{label}}: {{value}}\n{{/each}}{{/if}}",
    "{{#if section}}\n{{section.title}}:\n{{section.body}}\n{{/if}}",
    "{{#if badge}}\n[{{badge}}]\n{{/if}}",
    "{{/each}}",
    "{{#if footer}}\n{{#each footer}}{{this}}\n{{/each}}{{/if}}",
);

struct Templates {
    html: Handlebars<'static>,
    text: Handlebars<'static>,
}

impl Templates {
    fn load() -> Result<Self, TemplateError> {
        let mut html = Handlebars::new();
        html.register_template_string(DOCUMENT, HTML_TEMPLATE)?;

        let mut text = Handlebars::new();
        text.register_escape_fn(handlebars::no_escape);
        text.register_template_string(DOCUMENT, TEXT_TEMPLATE)?;

        Ok(Self { html, text })
    }
}

static TEMPLATES: LazyLock<Result<Templates, String>> =
    LazyLock::new(|| Templates::load().map_err(|e| e.to_string()));

fn templates() -> anyhow::Result<&'static Templates> {
    TEMPLATES
        .as_ref()
        .map_err(|e| anyhow::anyhow!("failed to register email templates: {e}"))
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub brand: String,
    pub tagline: Option<String>,
    pub heading: String,
    pub blocks: Vec<Block>,
    pub footer: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Paragraph(String),
    Fields { title: String, rows: Vec<Field> },
    Section { title: String, body: String },
    Badge(String),
}

/// One labelled value in a [`Block::Fields`] table.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Template context: the document plus values derived from it.
#[derive(Serialize)]
struct View<'a> {
    banner: String,
    #[serde(flatten)]
    document: &'a Document,
}

impl Document {
    fn view(&self) -> View<'_> {
        View {
            banner: self.brand.to_uppercase(),
            document: self,
        }
    }

    pub fn render_html(&self) -> anyhow::Result<String> {
        templates()?
            .html
            .render(DOCUMENT, &self.view())
            .map_err(|e| anyhow::anyhow!("failed to render HTML body: {e}"))
    }

    pub fn render_text(&self) -> anyhow::Result<String> {
        templates()?
            .text
            .render(DOCUMENT, &self.view())
            .map_err(|e| anyhow::anyhow!("failed to render text body: {e}"))
    }
}
