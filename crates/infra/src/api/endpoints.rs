//! URL construction for the Data API routes.
//!
//! Layout names, record ids and the solution name are appended as
//! percent-encoded path segments, so names containing spaces or slashes
//! address the intended resource.

use url::Url;

use super::errors::ApiError;

/// Route builder bound to one server and solution.
#[derive(Debug, Clone)]
pub struct FmsEndpoints {
    base: Url,
    solution: String,
}

impl FmsEndpoints {
    /// Parse the configured base URL (with or without a trailing slash).
    ///
    /// # Errors
    ///
    /// Returns error if the URL is malformed or cannot carry a path
    pub fn new(fms_url: &str, solution: impl Into<String>) -> Result<Self, ApiError> {
        let base = Url::parse(fms_url)
            .map_err(|e| ApiError::Config(format!("invalid fms_url {fms_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!("fms_url {fms_url:?} cannot carry a path")));
        }

        Ok(Self { base, solution: solution.into() })
    }

    /// Solution (database) name the routes address.
    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    /// `auth/{solution}`
    #[must_use]
    pub fn auth(&self) -> Url {
        self.join(&["auth", &self.solution])
    }

    /// `record/{solution}/{layout}`
    #[must_use]
    pub fn layout(&self, layout: &str) -> Url {
        self.join(&["record", &self.solution, layout])
    }

    /// `record/{solution}/{layout}/{id}`
    #[must_use]
    pub fn record(&self, layout: &str, id: &str) -> Url {
        self.join(&["record", &self.solution, layout, id])
    }

    /// `find/{solution}/{layout}`
    #[must_use]
    pub fn find(&self, layout: &str) -> Url {
        self.join(&["find", &self.solution, layout])
    }

    /// `global/{solution}/{layout}/` (the server expects the trailing slash)
    #[must_use]
    pub fn global(&self, layout: &str) -> Url {
        self.join(&["global", &self.solution, layout, ""])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
