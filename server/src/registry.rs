//! Static tool registry.
//!
//! Every HEMIS tool is one [`ToolEntry`]: the endpoint it fetches, the
//! parameters it accepts, whether it needs a bearer token, the fixed
//! message returned when the backend yields nothing usable, and a pure
//! formatter from the payload to a Markdown report.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::reports;

/// Default response language when the caller does not pass one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

pub type Formatter = fn(&Value, &ToolArgs) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
}

pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub endpoint: &'static str,
    pub params: &'static [ParamSpec],
    pub requires_auth: bool,
    /// Returned verbatim when the fetch fails or the envelope is not a success.
    pub empty_message: &'static str,
    pub format: Formatter,
}

/// Decoded call arguments, with defaults applied.
#[derive(Debug)]
pub struct ToolArgs {
    pub language: String,
    values: BTreeMap<&'static str, String>,
}

impl ToolArgs {
    /// Decode raw MCP arguments against an entry's parameter specs.
    /// String and number values are both accepted; LLMs routinely send
    /// numeric codes either way.
    pub fn decode(
        entry: &ToolEntry,
        arguments: Option<&serde_json::Map<String, Value>>,
    ) -> Result<Self, String> {
        let language = arguments
            .and_then(|map| map.get("language"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();

        let mut values = BTreeMap::new();
        for spec in entry.params {
            let raw = arguments.and_then(|map| map.get(spec.name));
            match raw {
                Some(value) => {
                    let text = scalar_to_string(value).ok_or_else(|| {
                        format!("parameter '{}' must be a string or number", spec.name)
                    })?;
                    values.insert(spec.name, text);
                }
                None if spec.required => {
                    return Err(format!("missing required parameter '{}'", spec.name));
                }
                None => {
                    if let Some(default) = spec.default {
                        values.insert(spec.name, default.to_string());
                    }
                }
            }
        }

        Ok(Self { language, values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Integer view of a decoded parameter, for formatters that compute
    /// with it (pagination).
    pub fn i64_or(&self, name: &str, default: i64) -> i64 {
        self.get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Query pairs for the HEMIS request: the language parameter followed
    /// by the entry's parameters in declaration order.
    pub fn query(&self, entry: &ToolEntry) -> Vec<(&'static str, String)> {
        let mut query = vec![("l", self.language.clone())];
        for spec in entry.params {
            if let Some(value) = self.values.get(spec.name) {
                query.push((spec.name, value.clone()));
            }
        }
        query
    }

    #[cfg(test)]
    pub fn for_test(pairs: &[(&'static str, &str)]) -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            values: pairs
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// JSON schema object for an entry's input, in the shape MCP clients
/// expect under `input_schema`.
pub fn input_schema(entry: &ToolEntry) -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    for spec in entry.params {
        let kind = match spec.kind {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        };
        properties.insert(
            spec.name.to_string(),
            serde_json::json!({ "type": kind, "description": spec.description }),
        );
    }
    properties.insert(
        "language".to_string(),
        serde_json::json!({
            "type": "string",
            "description": "Language for the response (e.g. en-US, uz-UZ)"
        }),
    );

    let required: Vec<Value> = entry
        .params
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| Value::String(spec.name.to_string()))
        .collect();

    let mut schema = serde_json::Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema
}

const SEMESTER: ParamSpec = ParamSpec {
    name: "semester",
    description: "Semester code (e.g. \"14\" for 4th semester)",
    kind: ParamKind::String,
    required: true,
    default: None,
};

const SUBJECT: ParamSpec = ParamSpec {
    name: "subject",
    description: "Subject ID",
    kind: ParamKind::String,
    required: true,
    default: None,
};

const WEEK: ParamSpec = ParamSpec {
    name: "week",
    description: "Week ID (optional, current week if not specified)",
    kind: ParamKind::String,
    required: false,
    default: None,
};

const PAGE: ParamSpec = ParamSpec {
    name: "page",
    description: "Page number for pagination (0-based)",
    kind: ParamKind::Integer,
    required: false,
    default: Some("0"),
};

const LIMIT: ParamSpec = ParamSpec {
    name: "limit",
    description: "Number of tasks per page",
    kind: ParamKind::Integer,
    required: false,
    default: Some("10"),
};

pub fn registry() -> &'static [ToolEntry] {
    &REGISTRY
}

pub fn find(name: &str) -> Option<&'static ToolEntry> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

static REGISTRY: [ToolEntry; 24] = [
    ToolEntry {
        name: "get_student_profile",
        description: "Get your personal and academic information from HEMIS.",
        endpoint: "account/me",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student profile information.",
        format: reports::student::profile,
    },
    ToolEntry {
        name: "get_student_gpa_list",
        description: "Get your GPA information across academic years from HEMIS.",
        endpoint: "education/gpa-list",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch GPA information.",
        format: reports::education::gpa_list,
    },
    ToolEntry {
        name: "get_student_semesters",
        description: "Get your semester information across academic years from HEMIS.",
        endpoint: "education/semesters",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch semester information.",
        format: reports::education::semesters,
    },
    ToolEntry {
        name: "get_student_subjects",
        description: "Get your subjects and grades for a specific semester from HEMIS.",
        endpoint: "education/subject-list",
        params: &[SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch subject information for the specified semester.",
        format: reports::education::subjects_with_grades,
    },
    ToolEntry {
        name: "get_student_subjects_list",
        description: "Get your subjects list for a specific semester from HEMIS (without grades).",
        endpoint: "education/subjects",
        params: &[SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch subjects list for the specified semester.",
        format: reports::education::subjects_list,
    },
    ToolEntry {
        name: "get_student_attendance",
        description: "Get your attendance information for a specific subject in a semester from HEMIS.",
        endpoint: "education/attendance",
        params: &[SUBJECT, SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch attendance information for the specified subject and semester.",
        format: reports::education::attendance,
    },
    ToolEntry {
        name: "get_student_exams",
        description: "Get your exam schedule for a specific semester from HEMIS.",
        endpoint: "education/exam-table",
        params: &[SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch exam schedule for the specified semester.",
        format: reports::education::exams,
    },
    ToolEntry {
        name: "get_student_performance",
        description: "Get your performance and task information for a specific subject in a semester from HEMIS.",
        endpoint: "education/performance",
        params: &[SUBJECT, SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch performance information for the specified subject and semester.",
        format: reports::education::performance,
    },
    ToolEntry {
        name: "get_student_contract",
        description: "Get your contract information for the current academic year from HEMIS.",
        endpoint: "student/contract",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student contract information.",
        format: reports::student::contract,
    },
    ToolEntry {
        name: "get_student_contract_list",
        description: "Get your list of contracts for all academic years from HEMIS.",
        endpoint: "student/contract-list",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student contract list.",
        format: reports::student::contract_list,
    },
    ToolEntry {
        name: "get_student_decrees",
        description: "Get official orders/decrees related to you from HEMIS.",
        endpoint: "student/decree",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student decree information.",
        format: reports::student::decrees,
    },
    ToolEntry {
        name: "get_student_documents",
        description: "Get your official documents (diploma, transcripts, etc.) from HEMIS.",
        endpoint: "student/document",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student document information.",
        format: reports::student::documents,
    },
    ToolEntry {
        name: "get_all_student_documents",
        description: "Get all your official documents (diplomas, transcripts, references, decrees, etc.) from HEMIS.",
        endpoint: "student/document-all",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student documents information.",
        format: reports::student::all_documents,
    },
    ToolEntry {
        name: "get_student_references",
        description: "Get your official student references/certificates from HEMIS.",
        endpoint: "student/reference",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to fetch student references.",
        format: reports::student::references,
    },
    ToolEntry {
        name: "generate_student_reference",
        description: "Generate a new student reference/certificate from HEMIS.",
        endpoint: "student/reference-generate",
        params: &[],
        requires_auth: true,
        empty_message: "Unable to generate student reference. The university might not allow automatic reference generation.",
        format: reports::student::reference_generated,
    },
    ToolEntry {
        name: "get_student_resources",
        description: "Get electronic resources available for a specific subject in a semester from HEMIS.",
        endpoint: "education/resources",
        params: &[SUBJECT, SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch resources for the specified subject and semester.",
        format: reports::education::resources,
    },
    ToolEntry {
        name: "get_student_schedule",
        description: "Get your class schedule for a specific semester and week from HEMIS.",
        endpoint: "education/schedule",
        params: &[SEMESTER, WEEK],
        requires_auth: true,
        empty_message: "Unable to fetch schedule for the specified semester and week.",
        format: reports::education::schedule,
    },
    ToolEntry {
        name: "get_subject_details",
        description: "Get detailed information about a specific subject in your curriculum from HEMIS.",
        endpoint: "education/subject",
        params: &[SEMESTER, SUBJECT],
        requires_auth: true,
        empty_message: "Unable to fetch subject details for the specified subject and semester.",
        format: reports::education::subject_details,
    },
    ToolEntry {
        name: "get_student_task_list",
        description: "Get your list of tasks/assignments for a specific semester from HEMIS.",
        endpoint: "education/task-list",
        params: &[PAGE, LIMIT, SEMESTER],
        requires_auth: true,
        empty_message: "Unable to fetch tasks list for the specified semester.",
        format: reports::education::task_list,
    },
    ToolEntry {
        name: "get_employee_statistics",
        description: "Get statistics about university employees.",
        endpoint: "public/stat-employee",
        params: &[],
        requires_auth: false,
        empty_message: "Unable to fetch employee statistics.",
        format: reports::public_stats::employees,
    },
    ToolEntry {
        name: "get_university_structure",
        description: "Get statistics about university structure.",
        endpoint: "public/stat-structure",
        params: &[],
        requires_auth: false,
        empty_message: "Unable to fetch university structure statistics.",
        format: reports::public_stats::structure,
    },
    ToolEntry {
        name: "get_student_statistics",
        description: "Get statistics about university students.",
        endpoint: "public/stat-student",
        params: &[],
        requires_auth: false,
        empty_message: "Unable to fetch student statistics.",
        format: reports::public_stats::students,
    },
    ToolEntry {
        name: "get_universities",
        description: "Get a list of universities using HEMIS system.",
        endpoint: "public/universities",
        params: &[],
        requires_auth: false,
        empty_message: "Unable to fetch universities list.",
        format: reports::public_stats::universities,
    },
    ToolEntry {
        name: "get_university_profile",
        description: "Get profile information about university.",
        endpoint: "public/university-profile",
        params: &[],
        requires_auth: false,
        empty_message: "Unable to fetch university profile information.",
        format: reports::public_stats::university_profile,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tool_names_are_unique() {
        let mut names: Vec<_> = registry().iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn test_decode_accepts_string_and_number() {
        let entry = find("get_student_subjects").unwrap();
        let decoded =
            ToolArgs::decode(entry, Some(&args(json!({ "semester": "14" })))).unwrap();
        assert_eq!(decoded.get("semester"), Some("14"));

        let decoded = ToolArgs::decode(entry, Some(&args(json!({ "semester": 14 })))).unwrap();
        assert_eq!(decoded.get("semester"), Some("14"));
    }

    #[test]
    fn test_decode_rejects_missing_required() {
        let entry = find("get_student_attendance").unwrap();
        let err = ToolArgs::decode(entry, Some(&args(json!({ "subject": 5 })))).unwrap_err();
        assert!(err.contains("semester"));
    }

    #[test]
    fn test_decode_applies_pagination_defaults() {
        let entry = find("get_student_task_list").unwrap();
        let decoded =
            ToolArgs::decode(entry, Some(&args(json!({ "semester": "14" })))).unwrap();
        assert_eq!(decoded.get("page"), Some("0"));
        assert_eq!(decoded.get("limit"), Some("10"));
        assert_eq!(decoded.i64_or("page", 0), 0);
    }

    #[test]
    fn test_language_defaults_and_overrides() {
        let entry = find("get_student_profile").unwrap();
        let decoded = ToolArgs::decode(entry, None).unwrap();
        assert_eq!(decoded.language, "en-US");

        let decoded =
            ToolArgs::decode(entry, Some(&args(json!({ "language": "uz-UZ" })))).unwrap();
        assert_eq!(decoded.language, "uz-UZ");
    }

    #[test]
    fn test_query_starts_with_language_and_skips_absent_optionals() {
        let entry = find("get_student_schedule").unwrap();
        let decoded =
            ToolArgs::decode(entry, Some(&args(json!({ "semester": "14" })))).unwrap();
        let query = decoded.query(entry);
        assert_eq!(query[0], ("l", "en-US".to_string()));
        assert_eq!(query[1], ("semester", "14".to_string()));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_input_schema_shape() {
        let entry = find("get_student_attendance").unwrap();
        let schema = input_schema(entry);
        assert_eq!(schema["type"], json!("object"));
        assert!(schema["properties"]["subject"].is_object());
        assert!(schema["properties"]["language"].is_object());
        assert_eq!(schema["required"], json!(["subject", "semester"]));
    }
}
