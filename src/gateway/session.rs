/// The caller's access token as presented on the request, if any.
///
/// Opaque to this service: only the gateway can tell whether it is valid.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Blank tokens collapse to an anonymous session
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Self::anonymous();
        }
        Self { access_token: Some(trimmed.to_string()) }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.access_token {
            Some(_) => write!(f, "Session(<token>)"),
            None => write!(f, "Session(anonymous)"),
        }
    }
}
