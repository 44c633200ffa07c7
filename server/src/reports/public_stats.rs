//! Reports over the public statistics endpoints. No authentication.

use hemis_api::Doc;
use serde_json::Value;

use crate::registry::ToolArgs;

fn counts(out: &mut Vec<String>, map: Doc, indent: &str) {
    if let Some(object) = map.0.as_object() {
        for (key, count) in object {
            out.push(format!("{indent}- {key}: {}", Doc(count).display()));
        }
    }
}

fn grouped(out: &mut Vec<String>, map: Doc) {
    if let Some(object) = map.0.as_object() {
        for (key, inner) in object {
            out.push(format!("- {key}:"));
            counts(out, Doc(inner), "  ");
        }
    }
}

pub fn employees(data: &Value, _args: &ToolArgs) -> String {
    let stats = Doc(data);
    let mut out = Vec::new();

    out.push("## Position Statistics".to_string());
    counts(&mut out, stats.get("position"), "");

    out.push("\n## Gender Statistics".to_string());
    counts(&mut out, stats.get("gender"), "");

    out.push("\n## Citizenship Statistics".to_string());
    counts(&mut out, stats.get("citizenship"), "");

    out.push("\n## Academic Degree Statistics".to_string());
    grouped(&mut out, stats.get("academic_degree"));

    out.push("\n## Academic Rank Statistics".to_string());
    grouped(&mut out, stats.get("academic_rank"));

    out.push("\n## Direction Statistics".to_string());
    counts(&mut out, stats.get("direction"), "");

    out.push("\n## Academic Status".to_string());
    counts(&mut out, stats.get("academic"), "");

    out.push("\n## Age Statistics".to_string());
    grouped(&mut out, stats.get("age"));

    out.push("\n## Employment Form Statistics".to_string());
    counts(&mut out, stats.get("employment_form"), "");

    out.join("\n")
}

pub fn structure(data: &Value, _args: &ToolArgs) -> String {
    let stats = Doc(data);
    let mut out = Vec::new();

    out.push("## Student Groups Statistics".to_string());
    if let Some(groups) = stats.get("groups").0.as_object() {
        for (degree_type, courses) in groups {
            out.push(format!("### {degree_type}"));
            if let Some(courses) = courses.as_object() {
                for (course, count) in courses {
                    out.push(format!("- {course}: {} groups", Doc(count).display()));
                }
            }
        }
    }

    for (title, key) in [
        ("\n## Auditorium Statistics", "auditoriums"),
        ("\n## Specialties Statistics", "specialities"),
        ("\n## Department Statistics", "departments"),
    ] {
        out.push(title.to_string());
        for item in stats.get(key).array() {
            let item = Doc(item);
            out.push(format!(
                "- {}: {}",
                item.get("name").display(),
                item.get("count").display()
            ));
        }
    }

    out.join("\n")
}

pub fn students(data: &Value, _args: &ToolArgs) -> String {
    let stats = Doc(data);
    let mut out = Vec::new();

    out.push("## Education Type Statistics".to_string());
    heading_counts(&mut out, stats.get("education_type"));

    out.push("\n## Age Statistics".to_string());
    if let Some(levels) = stats.get("age").0.as_object() {
        for (level, age_groups) in levels {
            out.push(format!("### {level}"));
            if let Some(age_groups) = age_groups.as_object() {
                for (age_group, genders) in age_groups {
                    out.push(format!("#### {age_group}"));
                    counts(&mut out, Doc(genders), "");
                }
            }
        }
    }

    out.push("\n## Payment Type Statistics".to_string());
    heading_counts(&mut out, stats.get("payment"));

    out.push("\n## Regional Statistics".to_string());
    heading_counts(&mut out, stats.get("region"));

    out.push("\n## Citizenship Statistics".to_string());
    heading_counts(&mut out, stats.get("citizenship"));

    out.push("\n## Accommodation Statistics".to_string());
    heading_counts(&mut out, stats.get("accommodation"));

    out.push("\n## Education Form Statistics".to_string());
    if let Some(levels) = stats.get("education_form").0.as_object() {
        for (level, forms) in levels {
            out.push(format!("### {level}"));
            if let Some(forms) = forms.as_object() {
                for (form, genders) in forms {
                    out.push(format!("#### {form}"));
                    counts(&mut out, Doc(genders), "");
                }
            }
        }
    }

    out.push("\n## Student Level Statistics".to_string());
    if let Some(levels) = stats.get("level").0.as_object() {
        for (level, courses) in levels {
            out.push(format!("### {level}"));
            if let Some(courses) = courses.as_object() {
                for (course, forms) in courses {
                    out.push(format!("#### {course}"));
                    if let Some(forms) = forms.as_object() {
                        for (form, count) in forms {
                            // Only show forms with students
                            if Doc(count).i64().unwrap_or(0) > 0 {
                                out.push(format!("- {form}: {}", Doc(count).display()));
                            }
                        }
                    }
                }
            }
        }
    }

    out.join("\n")
}

fn heading_counts(out: &mut Vec<String>, map: Doc) {
    if let Some(object) = map.0.as_object() {
        for (key, inner) in object {
            out.push(format!("### {key}"));
            counts(out, Doc(inner), "");
        }
    }
}

pub fn universities(data: &Value, _args: &ToolArgs) -> String {
    let mut out = vec!["# Universities using HEMIS system".to_string()];

    for university in Doc(data).array() {
        let u = Doc(university);
        out.push(format!("\n## {}", u.get("name").display()));
        out.push(format!(
            "- University Type: {}",
            u.get("university_type").display()
        ));
    }

    out.join("\n")
}

pub fn university_profile(data: &Value, _args: &ToolArgs) -> String {
    let p = Doc(data);
    let mut out = Vec::new();

    out.push(format!("# {}", p.get("name").display()));

    out.push("\n## General Information".to_string());
    out.push(format!("- Contact: {}", p.get("contact").display()));
    out.push(format!("- Address: {}", p.get("address").display()));
    out.push(format!(
        "- Mailing Address: {}",
        p.get("mailing_address").display()
    ));

    out.push("\n## University Details".to_string());
    out.push(format!(
        "- Region: {}",
        p.path(&["soato", "name"]).display()
    ));
    out.push(format!(
        "- Ownership Type: {}",
        p.path(&["ownership", "name"]).display()
    ));

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_args() -> ToolArgs {
        ToolArgs::for_test(&[])
    }

    #[test]
    fn test_employee_stats_sections() {
        let data = json!({
            "position": { "Professor": 12, "Lecturer": 40 },
            "gender": { "Female": 20, "Male": 32 },
            "citizenship": {},
            "academic_degree": { "PhD": { "Female": 4, "Male": 8 } },
            "academic_rank": {},
            "direction": {},
            "academic": {},
            "age": {},
            "employment_form": {}
        });
        let report = employees(&data, &no_args());
        assert!(report.contains("- Professor: 12"));
        assert!(report.contains("- PhD:"));
        assert!(report.contains("  - Female: 4"));
    }

    #[test]
    fn test_structure_lists_counts() {
        let data = json!({
            "groups": { "Bachelor": { "1-kurs": 10 } },
            "auditoriums": [{ "name": "Lecture halls", "count": 24 }],
            "specialities": [],
            "departments": []
        });
        let report = structure(&data, &no_args());
        assert!(report.contains("- 1-kurs: 10 groups"));
        assert!(report.contains("- Lecture halls: 24"));
    }

    #[test]
    fn test_student_level_hides_empty_forms() {
        let data = json!({
            "education_type": {}, "age": {}, "payment": {}, "region": {},
            "citizenship": {}, "accommodation": {}, "education_form": {},
            "level": { "Bachelor": { "1-kurs": { "Full-time": 120, "Evening": 0 } } }
        });
        let report = students(&data, &no_args());
        assert!(report.contains("- Full-time: 120"));
        assert!(!report.contains("Evening"));
    }

    #[test]
    fn test_university_profile() {
        let data = json!({
            "name": "Tashkent University",
            "contact": "+998 71 000 00 00",
            "address": "Tashkent",
            "mailing_address": "Tashkent, University street 4",
            "soato": { "name": "Tashkent city" },
            "ownership": { "name": "State" }
        });
        let report = university_profile(&data, &no_args());
        assert!(report.starts_with("# Tashkent University"));
        assert!(report.contains("- Region: Tashkent city"));
    }
}
