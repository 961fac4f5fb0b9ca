//! HTML rendering of the capture list page.
//!
//! Every `{{...}}` expression is HTML-escaped by handlebars, so stored items
//! are always rendered as text.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::list::CaptureList;

const PAGE_TEMPLATE: &str = "page";

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <style>
    .item form {
      display: inline-block;
    }
  </style>
</head>

<body>
  <h1>Capture list</h1>
  <form action="{{domain}}" method="post">
    <input type="hidden" name="_csrf" value="{{csrf}}">
    <input type="text" name="item">
    <input type="submit" value="Add">
  </form>
  <ul>
    {{#each items}}
    <li class="item">
      {{this}}
      <form action="{{../base}}/delete/{{@index}}" method="post">
        <input type="hidden" name="_csrf" value="{{../csrf}}">
        <input type="submit" value="&times;">
      </form>
    </li>
    {{/each}}
  </ul>
</body>
</html>
"#;

#[derive(Serialize)]
struct PageData<'a> {
    title: &'a str,
    domain: &'a str,
    /// `domain` without a trailing slash, for building delete URLs.
    base: &'a str,
    csrf: &'a str,
    items: &'a [String],
}

/// Page renderer with the template compiled once.
pub struct View {
    registry: Handlebars<'static>,
    title: String,
}

impl View {
    pub fn new(title: impl Into<String>) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(PAGE_TEMPLATE, PAGE)?;

        Ok(Self {
            registry,
            title: title.into(),
        })
    }

    /// Render the full page for `list`.
    pub fn render(&self, list: &CaptureList, csrf: &str, domain: &str) -> Result<String, RenderError> {
        let data = PageData {
            title: &self.title,
            domain,
            base: domain.trim_end_matches('/'),
            csrf,
            items: list.items(),
        };
        self.registry.render(PAGE_TEMPLATE, &data)
    }
}
