//! Page-object imports and the shared named-instance registry

use std::collections::{HashMap, HashSet};

use stepforge_common::input::is_js_identifier;
use stepforge_common::{Error, PageObjectSpec, Result};

use crate::js::string_literal;

/// Identifiers the generated module already declares
pub const RESERVED_IDENTIFIERS: &[&str] = &[
    "Given",
    "When",
    "Then",
    "Before",
    "After",
    "expect",
    "TestDataManager",
    "IntegrationValidator",
    "pages",
    "page",
    "initializePageObjects",
    "setupFeatureContext",
    "cleanupFeatureContext",
    "waitForElement",
    "retryAction",
    "DEFAULT_WAIT_TIMEOUT",
    "DEFAULT_RETRY_COUNT",
    "DEFAULT_RETRY_DELAY",
    "MOCK_REQUIREMENTS",
    "setupProjectData",
    "cleanupProjectData",
    "setupFeatureData",
    "cleanupFeatureData",
    "setupEstimateData",
    "cleanupEstimateData",
    "setupUserData",
    "cleanupUserData",
];

/// Rendered page-object sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageObjectBindings {
    /// One `require` statement per distinct page-object class
    pub imports: Vec<String>,
    /// Registry declaration and initializer; absent when there are no page objects
    pub instantiation: Option<String>,
}

impl PageObjectBindings {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.instantiation.is_none()
    }
}

/// Bind page-object descriptors to imports and registry entries.
///
/// Exact duplicate descriptors collapse to one entry. A registry key or class
/// bound to two different descriptors is rejected, since the module would
/// either redeclare an import or silently overwrite an instance.
pub fn bind(page_objects: &[PageObjectSpec], page_object_dir: &str) -> Result<PageObjectBindings> {
    let mut seen: HashSet<&PageObjectSpec> = HashSet::new();
    let mut by_name: HashMap<&str, &PageObjectSpec> = HashMap::new();
    let mut by_class: HashMap<&str, &PageObjectSpec> = HashMap::new();
    let mut imports = Vec::new();
    let mut entries = Vec::new();

    for (i, spec) in page_objects.iter().enumerate() {
        if !seen.insert(spec) {
            continue;
        }

        if !is_js_identifier(&spec.class_name) {
            return Err(Error::malformed(
                format!("pageObjectDesign[{}].className", i),
                format!("'{}' is not a valid class identifier", spec.class_name),
            ));
        }

        if RESERVED_IDENTIFIERS.contains(&spec.class_name.as_str()) {
            return Err(Error::malformed(
                format!("pageObjectDesign[{}].className", i),
                format!("'{}' clashes with a generated identifier", spec.class_name),
            ));
        }

        if let Some(previous) = by_name.insert(spec.name.as_str(), spec) {
            return Err(Error::malformed(
                format!("pageObjectDesign[{}].name", i),
                format!(
                    "registry key '{}' is already bound to {}",
                    spec.name, previous.class_name
                ),
            ));
        }

        match by_class.get(spec.class_name.as_str()) {
            Some(previous) if previous.file_name != spec.file_name => {
                return Err(Error::malformed(
                    format!("pageObjectDesign[{}].className", i),
                    format!(
                        "class '{}' is imported from both '{}' and '{}'",
                        spec.class_name, previous.file_name, spec.file_name
                    ),
                ));
            }
            Some(_) => {}
            None => {
                by_class.insert(spec.class_name.as_str(), spec);
                imports.push(format!(
                    "const {{ {} }} = require({});",
                    spec.class_name,
                    string_literal(&import_path(page_object_dir, &spec.file_name))
                ));
            }
        }

        entries.push(format!(
            "  pages[{}] = new {}(page);",
            string_literal(&spec.name),
            spec.class_name
        ));
    }

    if entries.is_empty() {
        return Ok(PageObjectBindings::default());
    }

    let instantiation = format!(
        "// Page objects\nconst pages = {{}};\n\nfunction initializePageObjects(page) {{\n{}\n}}",
        entries.join("\n")
    );

    Ok(PageObjectBindings {
        imports,
        instantiation: Some(instantiation),
    })
}

fn import_path(dir: &str, file_name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("./{}", file_name)
    } else {
        format!("{}/{}", dir, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_page() -> PageObjectSpec {
        PageObjectSpec::new("main", "MainPage", "main-page")
    }

    #[test]
    fn test_single_page_object() {
        let bindings = bind(&[main_page()], "../pages").unwrap();
        assert_eq!(
            bindings.imports,
            vec!["const { MainPage } = require('../pages/main-page');"]
        );
        assert_eq!(
            bindings.instantiation.as_deref(),
            Some(
                "// Page objects\nconst pages = {};\n\nfunction initializePageObjects(page) {\n  \
                 pages['main'] = new MainPage(page);\n}"
            )
        );
    }

    #[test]
    fn test_no_page_objects_emit_nothing() {
        let bindings = bind(&[], "../pages").unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let bindings = bind(&[main_page(), main_page()], "../pages/").unwrap();
        assert_eq!(bindings.imports.len(), 1);
        assert_eq!(
            bindings.instantiation.unwrap().matches("new MainPage").count(),
            1
        );
    }

    #[test]
    fn test_shared_class_imports_once() {
        let specs = [
            PageObjectSpec::new("primary", "ListPage", "list-page"),
            PageObjectSpec::new("secondary", "ListPage", "list-page"),
        ];
        let bindings = bind(&specs, "../pages").unwrap();
        assert_eq!(bindings.imports.len(), 1);
        let instantiation = bindings.instantiation.unwrap();
        assert!(instantiation.contains("pages['primary'] = new ListPage(page);"));
        assert!(instantiation.contains("pages['secondary'] = new ListPage(page);"));
    }

    #[test]
    fn test_conflicting_registry_key_is_rejected() {
        let specs = [main_page(), PageObjectSpec::new("main", "OtherPage", "other-page")];
        let err = bind(&specs, "../pages").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref field, .. } if field == "pageObjectDesign[1].name"));
    }

    #[test]
    fn test_conflicting_class_source_is_rejected() {
        let specs = [main_page(), PageObjectSpec::new("alt", "MainPage", "alt-page")];
        let err = bind(&specs, "../pages").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref field, .. } if field == "pageObjectDesign[1].className"));
    }

    #[test]
    fn test_reserved_class_name_is_rejected() {
        let specs = [PageObjectSpec::new("x", "TestDataManager", "tdm")];
        assert!(bind(&specs, "../pages").is_err());
    }

    #[test]
    fn test_initializer_parameter_name_is_rejected() {
        let specs = [PageObjectSpec::new("x", "page", "page")];
        let err = bind(&specs, "../pages").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref field, .. } if field == "pageObjectDesign[0].className"));
    }

    #[test]
    fn test_language_reserved_word_is_rejected() {
        let specs = [PageObjectSpec::new("main", "class", "main-page")];
        let err = bind(&specs, "../pages").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref field, .. } if field == "pageObjectDesign[0].className"));
    }
}
