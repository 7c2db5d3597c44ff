use axum::http::Method;

/// Who may call which methods on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone may read; writes need authentication.
    ReadOnlyPublic,
    /// Anyone may create; everything else needs authentication.
    CreatePublic,
}

impl AccessPolicy {
    pub fn is_allowed(&self, method: &Method, is_authenticated: bool) -> bool {
        if is_authenticated {
            return true;
        }
        match self {
            AccessPolicy::ReadOnlyPublic => is_safe(method),
            AccessPolicy::CreatePublic => *method == Method::POST,
        }
    }
}

fn is_safe(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}
