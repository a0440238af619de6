//! HTML pages for the admin surface.
//!
//! Templates and stylesheets are compiled into the binary. A template is
//! filled by substituting `{{slot}}` markers; a marker left unfilled is a
//! render error.

use std::fmt::Write as _;

use lfsd_store::{MetaObject, MetaUser};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

const LAYOUT: &str = "body.html";

static TEMPLATES: &[(&str, &str)] = &[
    ("body.html", include_str!("../assets/templates/body.html")),
    ("config.html", include_str!("../assets/templates/config.html")),
    ("objects.html", include_str!("../assets/templates/objects.html")),
    ("users.html", include_str!("../assets/templates/users.html")),
];

static STYLESHEETS: &[(&str, &str)] = &[("mgmt.css", include_str!("../assets/css/mgmt.css"))];

/// A page of the admin surface and the data it shows.
#[derive(Clone, Copy, Debug)]
pub enum Page<'a> {
    Index(&'a ServerConfig),
    Objects(&'a [MetaObject]),
    Users(&'a [MetaUser]),
}

impl Page<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Objects(_) => "objects",
            Self::Users(_) => "users",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Self::Index(_) => "config.html",
            Self::Objects(_) => "objects.html",
            Self::Users(_) => "users.html",
        }
    }

    fn slots(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Index(config) => vec![
                ("listen", escape(&config.bind_addr.to_string())),
                ("content_path", escape(&config.content_path.display().to_string())),
                ("meta_db", escape(&config.meta_db.display().to_string())),
                ("admin_user", escape(&config.admin_user)),
                ("batch_size", config.refresh_batch_size.to_string()),
            ],
            Self::Objects(objects) => {
                let mut rows = String::new();
                for o in objects {
                    let _ = writeln!(
                        rows,
                        "        <tr><td class=\"oid\">{}</td><td>{}</td></tr>",
                        escape(o.id.as_str()),
                        o.size
                    );
                }
                vec![("count", objects.len().to_string()), ("rows", rows)]
            }
            Self::Users(users) => {
                let mut rows = String::new();
                for u in users {
                    let name = escape(&u.name);
                    let _ = writeln!(
                        rows,
                        "        <tr><td>{name}</td><td>{}</td><td>\
                         <form class=\"inline\" method=\"post\" action=\"/mgmt/del\">\
                         <input type=\"hidden\" name=\"name\" value=\"{name}\">\
                         <button class=\"btn\" type=\"submit\">Delete</button></form></td></tr>",
                        u.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    );
                }
                vec![("count", users.len().to_string()), ("rows", rows)]
            }
        }
    }
}

/// Look up a compiled-in template by name.
pub fn template(name: &str) -> ServerResult<&'static str> {
    TEMPLATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, t)| *t)
        .ok_or_else(|| ServerError::TemplateNotFound(name.to_string()))
}

/// Look up a compiled-in stylesheet by file name.
pub fn stylesheet(name: &str) -> Option<&'static str> {
    STYLESHEETS.iter().find(|(n, _)| *n == name).map(|(_, css)| *css)
}

/// Render a full page: its content template inside the shared layout.
pub fn render(page: Page<'_>) -> ServerResult<String> {
    let content = fill(page.template(), template(page.template())?, &page.slots())?;

    let selected = |name: &str| {
        let attr = if name == page.name() { " class=\"selected\"" } else { "" };
        attr.to_string()
    };
    let layout_slots = vec![
        ("name", page.name().to_string()),
        ("nav_index", selected("index")),
        ("nav_objects", selected("objects")),
        ("nav_users", selected("users")),
        ("content", content),
    ];
    fill(LAYOUT, template(LAYOUT)?, &layout_slots)
}

/// Substitute `{{slot}}` markers in a single left-to-right pass.
///
/// Slot values are inserted verbatim and never rescanned.
fn fill(name: &str, template: &str, slots: &[(&str, String)]) -> ServerResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| ServerError::Render(format!("{name}: unterminated slot")))?;
        let key = after[..end].trim();
        let value = slots
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| ServerError::Render(format!("{name}: no value for slot {key:?}")))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
