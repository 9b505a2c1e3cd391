use crate::error::{AxleError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Route name reservations.
///
/// A controller token reserves its route name on first registration only, so
/// mapping the same token under several HTTP methods yields one named route.
/// Reserved names also keep their path pattern for URL generation.
#[derive(Default)]
pub struct RouteNames {
    reserved: DashMap<String, String>,
    paths: DashMap<String, String>,
}

impl RouteNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name` for `token`. Returns whether the reservation was taken;
    /// a token that already holds a name is left untouched.
    pub fn reserve(&self, token: &str, name: &str, path: &str) -> bool {
        match self.reserved.entry(token.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(name.to_string());
                self.paths.insert(name.to_string(), path.to_string());
                true
            }
        }
    }

    pub fn is_reserved(&self, token: &str) -> bool {
        self.reserved.contains_key(token)
    }

    /// Build a URL for a named route, filling `{...}` path segments from
    /// `args` in order.
    pub fn url_for(&self, name: &str, args: &[&str]) -> Result<String> {
        let pattern = self
            .paths
            .get(name)
            .ok_or_else(|| AxleError::UnknownRouteName {
                name: name.to_string(),
            })?;
        let mut remaining = args.iter();
        let mut segments = Vec::new();
        for segment in pattern.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let value = remaining
                    .next()
                    .ok_or(AxleError::MissingArgument { index: args.len() })?;
                segments.push((*value).to_string());
            } else {
                segments.push(segment.to_string());
            }
        }
        Ok(segments.join("/"))
    }
}
