//! Run / preview assembly
//!
//! Turns the workspace's effective file contents into a self-contained HTML
//! document for an isolated preview surface. This is a literal known-pattern
//! substitution, not a bundler: stylesheet and script references whose names
//! resolve to workspace files are inlined, everything else is left alone.
//!
//! Standalone scripts never execute in the host context. They are wrapped
//! into a generated harness document that carries the same console bridge,
//! so all execution crosses the same sandbox boundary as HTML preview.
//!
//! Assembly is infallible: malformed input degrades to an error message
//! rendered inside the produced document.

pub mod console;

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::PreviewSettings;
use crate::vfs::NodeId;
use crate::workspace::Workspace;

/// How a file is run, classified by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTarget {
    Html,
    Script,
    Json,
    /// Anything else renders as escaped preformatted text.
    Plain,
}

impl RunTarget {
    pub fn classify(name: &str) -> RunTarget {
        let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => RunTarget::Html,
            "js" | "mjs" => RunTarget::Script,
            "json" => RunTarget::Json,
            _ => RunTarget::Plain,
        }
    }
}

/// Instrumentation injected into every preview document. Forwards
/// `console.log/warn/error` and uncaught errors to the host as
/// `{type: "console", method, args}` messages.
const BRIDGE_SNIPPET: &str = r#"<script>
(function () {
  var forward = function (method, args) {
    window.parent.postMessage(
      { type: "console", method: method, args: args.map(String) },
      "*"
    );
  };
  ["log", "warn", "error"].forEach(function (method) {
    var original = console[method];
    console[method] = function () {
      forward(method, Array.prototype.slice.call(arguments));
      original.apply(console, arguments);
    };
  });
  window.addEventListener("error", function (event) {
    forward("error", [event.message]);
  });
})();
</script>"#;

/// Produce the preview document for `id`. Folders and unknown ids yield an
/// error page; no input makes this return an error to the caller.
pub fn run(ws: &Workspace, id: NodeId, settings: &PreviewSettings) -> String {
    let Some(node) = ws.tree().find(id) else {
        return error_page("nothing to run");
    };
    let name = node.name.clone();
    let Some(text) = ws.effective_content(id) else {
        return error_page("cannot run a folder");
    };
    let target = RunTarget::classify(&name);
    debug!(%id, name = %name, ?target, "assembling preview");
    match target {
        RunTarget::Html => assemble_html(ws, text, settings),
        RunTarget::Script => script_harness(&name, text, settings),
        RunTarget::Json => render_json(&name, text),
        RunTarget::Plain => render_plain(&name, text),
    }
}

fn stylesheet_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<link\s+rel="stylesheet"\s+href="([^"]+)"\s*/?>"#).expect("valid pattern")
    })
}

fn script_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<script\s+src="([^"]+)"\s*>\s*</script>"#).expect("valid pattern")
    })
}

/// Inline known stylesheet/script references with their effective content
/// and inject the console bridge. References that do not resolve to a
/// workspace file are left untouched.
fn assemble_html(ws: &Workspace, html: &str, settings: &PreviewSettings) -> String {
    let inlined = stylesheet_link_re().replace_all(html, |caps: &Captures| {
        match lookup_by_reference(ws, &caps[1]) {
            Some(css) => format!("<style>\n{}\n</style>", css),
            None => caps[0].to_string(),
        }
    });
    let inlined = script_src_re().replace_all(&inlined, |caps: &Captures| {
        match lookup_by_reference(ws, &caps[1]) {
            Some(js) => format!("<script>\n{}\n</script>", js),
            None => caps[0].to_string(),
        }
    });
    if settings.inject_console_bridge {
        inject_bridge(&inlined)
    } else {
        inlined.into_owned()
    }
}

/// Resolve an `href`/`src` reference to a workspace file's effective
/// content by its final path segment.
fn lookup_by_reference<'a>(ws: &'a Workspace, reference: &str) -> Option<&'a str> {
    let name = reference.rsplit('/').next()?;
    let entry = ws
        .tree()
        .paths()
        .into_iter()
        .find(|e| e.is_file && e.path.rsplit('/').next() == Some(name))?;
    ws.effective_content(entry.id)
}

/// The bridge must run before any user script, so it goes right after
/// `<head>` when present, else at the top of the document.
fn inject_bridge(html: &str) -> String {
    if let Some(pos) = html.find("<head>") {
        let insert_at = pos + "<head>".len();
        format!("{}\n{}{}", &html[..insert_at], BRIDGE_SNIPPET, &html[insert_at..])
    } else {
        format!("{}\n{}", BRIDGE_SNIPPET, html)
    }
}

/// Wrap a standalone script into a harness document so it executes behind
/// the same sandbox boundary as HTML preview.
fn script_harness(name: &str, code: &str, settings: &PreviewSettings) -> String {
    let bridge = if settings.inject_console_bridge {
        BRIDGE_SNIPPET
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>{}<title>{}</title></head>\n\
         <body>\n<script>\n{}\n</script>\n</body>\n</html>",
        bridge,
        html_escape(name),
        code
    )
}

/// Pretty-print JSON; a parse failure becomes error text inside the
/// preview, not a failed operation.
fn render_json(name: &str, text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string());
            document(name, &format!("<pre>{}</pre>", html_escape(&pretty)))
        }
        Err(err) => error_page(&format!("JSON parse error in {}: {}", name, err)),
    }
}

fn render_plain(name: &str, text: &str) -> String {
    document(name, &format!("<pre>{}</pre>", html_escape(text)))
}

fn error_page(message: &str) -> String {
    document(
        "error",
        &format!("<pre class=\"error\">{}</pre>", html_escape(message)),
    )
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>",
        html_escape(title),
        body
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
