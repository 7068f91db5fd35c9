//! Analysis-result documents (JSON or YAML)
//!
//! Documents are shape-checked as untyped values before typed decoding so a
//! malformed document is rejected with the path of the offending field.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{AnalysisResult, StepKeyword};

/// Parse an analysis result from a JSON string
pub fn from_json(json: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

/// Parse an analysis result from a YAML string
pub fn from_yaml(yaml: &str) -> Result<AnalysisResult> {
    let value: Value = serde_yaml::from_str(yaml)?;
    from_value(value)
}

/// Validate and decode an untyped document
pub fn from_value(value: Value) -> Result<AnalysisResult> {
    validate_shape(&value)?;
    let analysis: AnalysisResult = serde_json::from_value(value)?;
    Ok(analysis)
}

/// Parse an analysis result from a file, choosing the format by extension
pub fn from_file(path: &Path) -> Result<AnalysisResult> {
    let content = std::fs::read_to_string(path)?;
    let analysis = match extension(path).as_deref() {
        Some("json") => from_json(&content)?,
        Some("yaml") | Some("yml") => from_yaml(&content)?,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };
    debug!(
        "Loaded analysis '{}' ({} scenarios) from {}",
        analysis.feature_name,
        analysis.cucumber_scenarios.len(),
        path.display()
    );
    Ok(analysis)
}

/// Load every analysis document in a directory, ordered by path
pub fn load_all(dir: &Path) -> Result<Vec<(PathBuf, AnalysisResult)>> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_analysis_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let analysis = from_file(&path)?;
        documents.push((path, analysis));
    }

    Ok(documents)
}

/// Whether a path looks like an analysis document
pub fn is_analysis_file(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("json" | "yaml" | "yml"))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Characters that end a line in JavaScript source
pub const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// ECMAScript reserved words, including strict-mode and contextual ones that
/// cannot be bound by a `const` declaration
pub const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "default", "delete", "do", "else", "enum", "eval", "export",
    "extends", "false", "finally", "for", "function", "if", "implements", "import",
    "in", "instanceof", "interface", "let", "new", "null", "package", "private",
    "protected", "public", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `name` can be used verbatim as a JavaScript identifier
pub fn is_js_identifier(name: &str) -> bool {
    if RESERVED_WORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(path: &str, what: &str, found: &Value) -> Error {
    Error::malformed(path, format!("expected {}, found {}", what, kind(found)))
}

fn validate_shape(root: &Value) -> Result<()> {
    let obj = root
        .as_object()
        .ok_or_else(|| expected("$", "an object", root))?;

    match obj.get("featureName") {
        Some(Value::String(_)) => {}
        Some(other) => return Err(expected("featureName", "a string", other)),
        None => return Err(Error::malformed("featureName", "missing required field")),
    }

    if let Some(scenarios) = optional_array(obj, "cucumberScenarios")? {
        for (i, scenario) in scenarios.iter().enumerate() {
            validate_scenario(&format!("cucumberScenarios[{}]", i), scenario)?;
        }
    }

    if let Some(points) = optional_array(obj, "integrationPoints")? {
        for (i, point) in points.iter().enumerate() {
            validate_integration_point(&format!("integrationPoints[{}]", i), point)?;
        }
    }

    if let Some(page_objects) = optional_array(obj, "pageObjectDesign")? {
        for (i, page_object) in page_objects.iter().enumerate() {
            validate_page_object(&format!("pageObjectDesign[{}]", i), page_object)?;
        }
    }

    if let Some(attr) = obj
        .get("technicalArchitecture")
        .and_then(|arch| arch.get("selectorAttribute"))
    {
        let path = "technicalArchitecture.selectorAttribute";
        let attr = attr.as_str().ok_or_else(|| expected(path, "a string", attr))?;
        if !is_attribute_name(attr) {
            return Err(Error::malformed(
                path,
                format!("'{}' is not a valid attribute name", attr),
            ));
        }
    }

    Ok(())
}

fn optional_array<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<Option<&'a Vec<Value>>> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(expected(field, "an ordered sequence", other)),
    }
}

fn validate_scenario(path: &str, scenario: &Value) -> Result<()> {
    match scenario {
        Value::Array(steps) => validate_steps(path, steps),
        Value::Object(obj) => {
            if let Some(name) = obj.get("name") {
                if !(name.is_string() || name.is_null()) {
                    return Err(expected(&format!("{}.name", path), "a string", name));
                }
            }
            let steps_path = format!("{}.steps", path);
            match obj.get("steps") {
                Some(Value::Array(steps)) => validate_steps(&steps_path, steps),
                Some(other) => Err(expected(&steps_path, "an ordered sequence", other)),
                None => Err(Error::malformed(steps_path, "missing required field")),
            }
        }
        other => Err(expected(path, "a step sequence or scenario object", other)),
    }
}

fn validate_steps(path: &str, steps: &[Value]) -> Result<()> {
    let mut has_previous = false;

    for (i, step) in steps.iter().enumerate() {
        let step_path = format!("{}[{}]", path, i);
        let obj = step
            .as_object()
            .ok_or_else(|| expected(&step_path, "a step object", step))?;

        let keyword_path = format!("{}.keyword", step_path);
        let keyword = match obj.get("keyword") {
            Some(Value::String(k)) => k,
            Some(other) => return Err(expected(&keyword_path, "a string", other)),
            None => return Err(Error::malformed(keyword_path, "missing required field")),
        };
        match StepKeyword::parse(keyword) {
            Some(StepKeyword::Category(_)) => {}
            Some(StepKeyword::Conjunction) if has_previous => {}
            Some(StepKeyword::Conjunction) => {
                return Err(Error::malformed(
                    keyword_path,
                    format!("'{}' has no preceding step to continue", keyword.trim()),
                ))
            }
            None => {
                return Err(Error::malformed(
                    keyword_path,
                    format!("unknown step keyword '{}'", keyword.trim()),
                ))
            }
        }
        has_previous = true;

        let text_path = format!("{}.text", step_path);
        let text = match obj.get("text") {
            Some(Value::String(t)) => t,
            Some(other) => return Err(expected(&text_path, "a string", other)),
            None => return Err(Error::malformed(text_path, "missing required field")),
        };
        if text.trim().is_empty() {
            return Err(Error::malformed(text_path, "step text must not be empty"));
        }
        if text.contains(LINE_TERMINATORS) {
            return Err(Error::malformed(text_path, "step text must be a single line"));
        }

        if let Some(data) = obj.get("data") {
            validate_step_data(&format!("{}.data", step_path), data)?;
        }
    }

    Ok(())
}

fn validate_step_data(path: &str, data: &Value) -> Result<()> {
    match data {
        Value::Null | Value::String(_) => Ok(()),
        Value::Array(rows) => {
            for (r, row) in rows.iter().enumerate() {
                let row_path = format!("{}[{}]", path, r);
                let cells = row
                    .as_array()
                    .ok_or_else(|| expected(&row_path, "a table row", row))?;
                for (c, cell) in cells.iter().enumerate() {
                    if !cell.is_string() {
                        return Err(expected(&format!("{}[{}]", row_path, c), "a string", cell));
                    }
                }
            }
            Ok(())
        }
        other => Err(expected(path, "a data table or doc string", other)),
    }
}

fn validate_integration_point(path: &str, point: &Value) -> Result<()> {
    let name = match point {
        Value::String(name) => name,
        Value::Object(obj) => {
            let name_path = format!("{}.name", path);
            match obj.get("name") {
                Some(Value::String(name)) => name,
                Some(other) => return Err(expected(&name_path, "a string", other)),
                None => return Err(Error::malformed(name_path, "missing required field")),
            }
        }
        other => return Err(expected(path, "a name or integration object", other)),
    };
    if name.trim().is_empty() {
        return Err(Error::malformed(path, "integration name must not be empty"));
    }
    Ok(())
}

fn validate_page_object(path: &str, page_object: &Value) -> Result<()> {
    let obj = page_object
        .as_object()
        .ok_or_else(|| expected(path, "a page object", page_object))?;

    for field in ["name", "className", "fileName"] {
        let field_path = format!("{}.{}", path, field);
        let value = match obj.get(field) {
            Some(Value::String(v)) => v,
            Some(other) => return Err(expected(&field_path, "a string", other)),
            None => return Err(Error::malformed(field_path, "missing required field")),
        };
        if value.trim().is_empty() || value.contains(LINE_TERMINATORS) {
            return Err(Error::malformed(field_path, "must be a non-empty single line"));
        }
        if field == "className" && !is_js_identifier(value) {
            return Err(Error::malformed(
                field_path,
                format!("'{}' is not a valid class identifier", value),
            ));
        }
    }

    Ok(())
}
