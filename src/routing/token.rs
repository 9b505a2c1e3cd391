use crate::config::Conventions;
use crate::error::{AxleError, Result};

/// A parsed `"Controller:action"` route token.
///
/// `controller_key` is the container registry key after applying the class
/// prefix and suffix conventions; `method_name` is the action with the
/// method suffix applied. An alias starting with `.` is absolute: it skips
/// the configured prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteToken {
    pub controller_key: String,
    pub method_name: String,
}

impl RouteToken {
    /// Parse a token under the given conventions.
    ///
    /// The token must contain exactly one `:` with a non-empty alias and
    /// action on either side. The alias may contain ASCII alphanumerics,
    /// `_` and the `.` namespace separator; the action may contain ASCII
    /// alphanumerics and `_`.
    pub fn parse(token: &str, conventions: &Conventions) -> Result<Self> {
        let malformed = || AxleError::MalformedToken {
            token: token.to_string(),
        };

        let (alias, action) = token.split_once(':').ok_or_else(malformed)?;
        if alias.is_empty() || action.is_empty() || action.contains(':') {
            return Err(malformed());
        }
        if !alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(malformed());
        }
        if !action.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(malformed());
        }

        let controller_key = match alias.strip_prefix('.') {
            Some(absolute) => {
                if absolute.is_empty() {
                    return Err(malformed());
                }
                format!("{absolute}{}", conventions.class_suffix)
            }
            None => format!(
                "{}{alias}{}",
                conventions.class_prefix, conventions.class_suffix
            ),
        };
        let method_name = format!("{action}{}", conventions.method_suffix);

        Ok(Self {
            controller_key,
            method_name,
        })
    }

    /// Whether a string target looks like a route token rather than a plain
    /// value: exactly one `:`, not in the leading position.
    pub fn is_token(target: &str) -> bool {
        target.match_indices(':').count() == 1 && !target.starts_with(':')
    }
}
