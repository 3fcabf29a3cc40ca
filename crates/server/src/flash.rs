//! One-shot messages carried across a redirect in the session.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::ServerResult;

const FLASH_KEY: &str = "flash.error";

/// Extractor over the request's session. A message stored with [`Flash::set`]
/// is returned by exactly one later [`Flash::take`].
#[derive(Debug, Clone)]
pub struct Flash {
    session: Session,
}

impl Flash {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Store `message`, replacing any message not yet shown.
    pub async fn set(&self, message: impl Into<String>) -> ServerResult<()> {
        self.session.insert(FLASH_KEY, message.into()).await?;
        Ok(())
    }

    /// Read and clear the pending message.
    pub async fn take(&self) -> ServerResult<Option<String>> {
        Ok(self.session.remove::<String>(FLASH_KEY).await?)
    }
}

impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Flash::new)
    }
}
