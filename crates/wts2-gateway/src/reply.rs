//! Outbound responses, shared by the HTTP server and the CGI entrypoint

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Html(String),
    Json(Value),
}

impl Reply {
    pub fn no_action() -> Self {
        Self::Html("No action.".into())
    }

    /// Wrap transcript lines in `<pre>`, escaping their text.
    pub fn transcript<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut html = String::from("<html><body><pre>\n");
        for line in lines {
            html.push_str(&escape_html(line.as_ref()));
            html.push('\n');
        }
        html.push_str("</pre></body></html>");
        Self::Html(html)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html(_) => "text/html",
            Self::Json(_) => "application/json",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::Html(html) => html.clone(),
            Self::Json(value) => value.to_string(),
        }
    }

    /// CGI form: header, blank line, body.
    pub fn to_cgi(&self) -> String {
        format!("Content-type: {}\n\n{}\n", self.content_type(), self.body())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let content_type = match &self {
            Self::Html(_) => "text/html; charset=utf-8",
            Self::Json(_) => "application/json",
        };
        ([(CONTENT_TYPE, content_type)], self.body()).into_response()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
