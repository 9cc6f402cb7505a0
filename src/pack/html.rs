use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::assets::manifest::FILES_GLOBAL;
use crate::foundation::encoding::js_string_literal;
use crate::project::settings::ProjectSettings;

/// Marker replaced with the analytics identifier.
pub const ANALYTICS_MARKER: &str = "NIN_WILL_REPLACE_THIS_TAG_WITH_YOUR_ANALYTICS_ID";
/// Marker replaced with metadata HTML comments.
pub const COMMENT_TAGS_MARKER: &str = "NIN_WILL_REPLACE_THIS_TAG_WITH_AUTOGENERATED_COMMENT_TAGS";
/// Marker replaced with open-graph meta tags.
pub const META_TAGS_MARKER: &str = "NIN_WILL_REPLACE_THIS_TAG_WITH_AUTOGENERATED_META_TAGS";

/// Globals initialized, in this order, before any generated code runs.
pub const RUNTIME_SENTINELS: [(&str, &str); 3] = [("GU", "1"), ("BEAN", "0"), ("BEAT", "false")];

/// Manifest key of the demo graph handed to the runtime entry point.
pub const GRAPH_ASSET: &str = "graph.json";

/// Descriptive metadata stamped into both artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    /// Demo title.
    pub title: String,
    /// Comma separated authors.
    pub author: String,
    /// Description.
    pub description: String,
    /// Build time.
    pub created: DateTime<Utc>,
    /// Project and tool versions.
    pub software: String,
    /// Open-graph preview image URL.
    pub preview_image: String,
}

impl Metadata {
    /// Metadata for a build of `settings` happening at `created`.
    pub fn from_settings(settings: &ProjectSettings, created: DateTime<Utc>) -> Self {
        let origin = if settings.origin.is_empty() {
            "unknown origin"
        } else {
            settings.origin.as_str()
        };
        Self {
            title: settings.title.clone(),
            author: settings.author_line(),
            description: settings.description.clone(),
            created,
            software: format!(
                "{} @ {}\n{}@{}",
                settings.version,
                origin,
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            preview_image: settings.preview_image.clone(),
        }
    }

    /// Display entries in their fixed order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Author", self.author.clone()),
            ("Description", self.description.clone()),
            ("Creation time", self.created.to_rfc2822()),
            ("Software", self.software.clone()),
            ("previewImage", self.preview_image.clone()),
        ]
    }

    /// One `<!-- Key: value -->` line per entry.
    pub fn as_html_comments(&self) -> String {
        self.entries()
            .into_iter()
            .map(|(k, v)| format!("<!-- {k}: {} -->", v.replace("--", "- -")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Open-graph and author meta tags.
    pub fn as_meta_tags(&self) -> String {
        format!(
            "<meta property=\"og:title\" content=\"{}\" />\n\
             <meta property=\"og:description\" content=\"{}\" />\n\
             <meta property=\"og:image\" content=\"{}\" />\n\
             <meta name=\"author\" content=\"{}\" />",
            escape_html(&self.title),
            escape_html(&self.description),
            escape_html(&self.preview_image),
            escape_html(&self.author),
        )
    }
}

/// Substitute the three template markers.
pub fn render_preamble(template: &str, settings: &ProjectSettings, metadata: &Metadata) -> String {
    template
        .replace(ANALYTICS_MARKER, &escape_html(&settings.analytics_id))
        .replace(COMMENT_TAGS_MARKER, &metadata.as_html_comments())
        .replace(META_TAGS_MARKER, &metadata.as_meta_tags())
}

/// The script every artifact runs: sentinel globals, compiled code, then the bootstrap call that
/// decodes the graph asset and starts the demo.
pub fn runtime_script(compiled_code: &str, graph_key: &str) -> String {
    let mut out = String::with_capacity(compiled_code.len() + 256);
    for (name, value) in RUNTIME_SENTINELS {
        let _ = write!(out, "{name}={value};");
    }
    out.push_str(compiled_code);
    if !compiled_code.ends_with(';') && !compiled_code.ends_with('\n') && !compiled_code.is_empty()
    {
        out.push(';');
    }
    let key = js_string_literal(graph_key);
    let _ = write!(
        out,
        "var graph=JSON.parse(atob({FILES_GLOBAL}[{key}]));\
         demo=bootstrap({{graph:graph,onprogress:ONPROGRESS,oncomplete:ONCOMPLETE}});"
    );
    out
}

/// Uncompressed artifact: preamble followed by the runtime script inline.
pub fn build_html(preamble: &str, script: &str) -> String {
    let mut out = String::with_capacity(preamble.len() + script.len() + 32);
    out.push_str(preamble);
    out.push_str("<script>");
    out.push_str(script);
    out.push_str("</script>");
    out
}

/// Escape text for use in HTML attribute values and text nodes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pack/html.rs"]
mod tests;
