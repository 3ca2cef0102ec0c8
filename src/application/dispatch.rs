//! Map a path resolution to the action a page handler should take.

use otl_api_types::{AllMatches, PathResolution, RedirectTarget, ResolutionType};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_REDIRECT_STATUS: u16 = 301;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Render,
    Redirect,
    #[serde(rename = "notfound")]
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDecision {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl PathDecision {
    fn render(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            action: Action::Render,
            data: Some(data),
            redirect_to: None,
            status_code: None,
        }
    }

    fn redirect(to: String, status: Option<u16>) -> Self {
        Self {
            kind: ResolutionType::Redirect.to_string(),
            action: Action::Redirect,
            data: None,
            redirect_to: Some(to),
            status_code: Some(status.filter(|s| *s != 0).unwrap_or(DEFAULT_REDIRECT_STATUS)),
        }
    }

    fn not_found(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            action: Action::NotFound,
            data: None,
            redirect_to: None,
            status_code: None,
        }
    }
}

/// Decide how to answer a resolved path. Never fails.
pub fn handle_path_resolution(resolution: &PathResolution) -> PathDecision {
    match &resolution.kind {
        ResolutionType::Redirect => {
            let redirect = resolution.redirect.as_ref();
            let target = redirect
                .and_then(|r| non_empty(&r.to_path))
                .or_else(|| redirect.and_then(|r| non_empty(&r.to_url)))
                .unwrap_or("/");
            PathDecision::redirect(target.to_string(), resolution.status_code)
        }
        ResolutionType::NotFound => PathDecision::not_found(ResolutionType::NotFound.as_str()),
        kind @ (ResolutionType::Page | ResolutionType::BlogPost | ResolutionType::BlogCategory) => {
            PathDecision::render(kind.as_str(), content_or_id(resolution))
        }
        ResolutionType::Multiple => multiple(resolution.all_matches.as_ref()),
        ResolutionType::Unknown(_) => PathDecision::not_found("unknown"),
    }
}

fn multiple(matches: Option<&AllMatches>) -> PathDecision {
    let primary = matches.and_then(|m| non_empty(&m.primary_match));

    if primary == Some(ResolutionType::Redirect.as_str()) {
        if let Some(RedirectTarget {
            to_path,
            status_code,
            ..
        }) = matches.and_then(|m| m.redirect.as_ref())
        {
            let target = non_empty(to_path).unwrap_or("/");
            return PathDecision::redirect(target.to_string(), *status_code);
        }
    }

    let mut decision = PathDecision::render(
        primary.unwrap_or(ResolutionType::Page.as_str()),
        Value::Null,
    );
    decision.data = matches.and_then(|m| serde_json::to_value(m).ok());
    decision
}

fn content_or_id(resolution: &PathResolution) -> Value {
    if let Some(content) = &resolution.content {
        return Value::Object(content.clone());
    }
    let mut fallback = Map::new();
    if let Some(id) = &resolution.content_id {
        fallback.insert("id".into(), Value::String(id.clone()));
    }
    Value::Object(fallback)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
