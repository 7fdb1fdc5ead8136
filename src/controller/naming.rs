/// Lowercase a CamelCase identifier, inserting `separator` at case transitions.
///
/// `UserProfile` → `user-profile`, `HTMLParser` → `html-parser`. Input that is
/// already lowercase passes through unchanged.
#[must_use]
pub fn camel_to_separator(input: &str, separator: char) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && !out.ends_with(separator) {
                    out.push(separator);
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Segment form used in view paths and router keys.
#[must_use]
pub fn normalize_segment(segment: &str) -> String {
    camel_to_separator(segment.trim(), '-')
}

/// (module, controller) pair of a controller instance, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerIdentity {
    module: String,
    controller: String,
}

impl ControllerIdentity {
    /// Explicit pair, stored as given.
    pub fn new(module: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            controller: controller.into(),
        }
    }

    /// Derive the identity from a declared namespace path and type name.
    ///
    /// The module is the top-level namespace segment however deep the path
    /// is (`Shop::Admin::Orders` → `Shop`). The controller is the type name
    /// minus its `Controller` suffix, case-converted (`UserProfileController`
    /// → `user-profile`).
    #[must_use]
    pub fn derive(namespace: &str, type_name: &str) -> Self {
        let module = namespace
            .split("::")
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_string();
        let base = type_name.rsplit("::").next().unwrap_or(type_name).trim();
        let base = base
            .strip_suffix("Controller")
            .filter(|b| !b.is_empty())
            .unwrap_or(base);
        Self {
            module,
            controller: camel_to_separator(base, '-'),
        }
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Compare against a (module, controller) target, ignoring case style.
    #[must_use]
    pub fn matches(&self, module: &str, controller: &str) -> bool {
        normalize_segment(&self.module) == normalize_segment(module)
            && normalize_segment(&self.controller) == normalize_segment(controller)
    }

    /// Default view script: `module/controller/action`, each segment
    /// normalized, empty segments dropped.
    #[must_use]
    pub fn view_script(&self, action: &str) -> String {
        [self.module.as_str(), self.controller.as_str(), action]
            .iter()
            .map(|s| normalize_segment(s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_separator() {
        assert_eq!(camel_to_separator("UserProfile", '-'), "user-profile");
        assert_eq!(camel_to_separator("HTMLParser", '-'), "html-parser");
        assert_eq!(camel_to_separator("Starlit", '-'), "starlit");
        assert_eq!(camel_to_separator("some-other", '-'), "some-other");
        assert_eq!(camel_to_separator("someOther", '_'), "some_other");
        assert_eq!(camel_to_separator("Page2Title", '-'), "page2-title");
    }

    #[test]
    fn test_derive_uses_top_level_namespace() {
        let id = ControllerIdentity::derive("Starlit::App", "TestController");
        assert_eq!(id.module(), "Starlit");
        assert_eq!(id.controller(), "test");

        let deep = ControllerIdentity::derive("Shop::Admin::Orders::Http", "UserProfileController");
        assert_eq!(deep.module(), "Shop");
        assert_eq!(deep.controller(), "user-profile");
    }

    #[test]
    fn test_derive_keeps_bare_controller_name() {
        assert_eq!(ControllerIdentity::derive("", "Controller").controller(), "controller");
        assert_eq!(ControllerIdentity::derive("", "crate::web::Index").controller(), "index");
    }

    #[test]
    fn test_view_script() {
        let id = ControllerIdentity::derive("Starlit::App", "TestController");
        assert_eq!(id.view_script("index"), "starlit/test/index");
        assert_eq!(id.view_script("someOther"), "starlit/test/some-other");

        let no_module = ControllerIdentity::new("", "test");
        assert_eq!(no_module.view_script("index"), "test/index");
    }

    #[test]
    fn test_matches_ignores_case_style() {
        let id = ControllerIdentity::derive("Starlit::App", "UserProfileController");
        assert!(id.matches("starlit", "user-profile"));
        assert!(id.matches("Starlit", "UserProfile"));
        assert!(!id.matches("starlit", "test"));
    }
}
