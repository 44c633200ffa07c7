//! Reports over the student record endpoints.

use hemis_api::Doc;
use serde_json::Value;

use super::{title_case, value_or_na};
use crate::registry::ToolArgs;

pub fn profile(data: &Value, _args: &ToolArgs) -> String {
    let p = Doc(data);
    let mut out = Vec::new();

    out.push("\n## Personal Information".to_string());
    out.push(format!(
        "- Full Name: {} {} {}",
        p.get("first_name").display(),
        p.get("second_name").display(),
        p.get("third_name").display()
    ));
    out.push(format!(
        "- Student ID: {}",
        value_or_na(p.get("student_id_number"))
    ));
    if p.get("birth_date").is_truthy() {
        out.push(format!("- Birth Date: {}", p.get("birth_date").date()));
    }
    out.push(format!(
        "- Gender: {}",
        value_or_na(p.path(&["gender", "name"]))
    ));
    out.push(format!(
        "- Passport Number: {}",
        value_or_na(p.get("passport_number"))
    ));
    out.push(format!(
        "- Passport PIN: {}",
        value_or_na(p.get("passport_pin"))
    ));
    out.push(format!("- Phone: {}", value_or_na(p.get("phone"))));
    if p.get("email").is_truthy() {
        out.push(format!("- Email: {}", p.get("email").display()));
    }

    out.push("\n## Address Information".to_string());
    out.push(format!(
        "- Country: {}",
        value_or_na(p.path(&["country", "name"]))
    ));
    out.push(format!(
        "- Province: {}",
        value_or_na(p.path(&["province", "name"]))
    ));
    out.push(format!(
        "- District: {}",
        value_or_na(p.path(&["district", "name"]))
    ));
    out.push(format!("- Address: {}", value_or_na(p.get("address"))));
    out.push(format!(
        "- Accommodation: {}",
        value_or_na(p.path(&["accommodation", "name"]))
    ));

    out.push("\n## Academic Information".to_string());
    out.push(format!("- University: {}", value_or_na(p.get("university"))));
    out.push(format!(
        "- Faculty: {} ({})",
        value_or_na(p.path(&["faculty", "name"])),
        p.path(&["faculty", "code"]).display()
    ));
    out.push(format!(
        "- Specialty: {} ({})",
        value_or_na(p.path(&["specialty", "name"])),
        p.path(&["specialty", "code"]).display()
    ));
    out.push(format!(
        "- Group: {}",
        value_or_na(p.path(&["group", "name"]))
    ));
    out.push(format!(
        "- Education Form: {}",
        value_or_na(p.path(&["educationForm", "name"]))
    ));
    out.push(format!(
        "- Education Type: {}",
        value_or_na(p.path(&["educationType", "name"]))
    ));
    out.push(format!(
        "- Education Language: {}",
        value_or_na(p.path(&["educationLang", "name"]))
    ));
    out.push(format!(
        "- Payment Form: {}",
        value_or_na(p.path(&["paymentForm", "name"]))
    ));
    out.push(format!(
        "- Course Level: {}",
        value_or_na(p.path(&["level", "name"]))
    ));
    out.push(format!(
        "- Current Semester: {}",
        value_or_na(p.path(&["semester", "name"]))
    ));
    out.push(format!(
        "- Academic Year: {}",
        value_or_na(p.path(&["semester", "education_year", "name"]))
    ));
    out.push(format!(
        "- Student Status: {}",
        value_or_na(p.path(&["studentStatus", "name"]))
    ));

    out.join("\n")
}

pub fn contract(data: &Value, _args: &ToolArgs) -> String {
    serde_json::to_string_pretty(data).unwrap_or_default()
}

pub fn contract_list(data: &Value, _args: &ToolArgs) -> String {
    let items = Doc(data).get("items");
    if !items.is_truthy() {
        return "No contracts found in your student record.".to_string();
    }

    let mut contracts: Vec<&Value> = items.array().iter().collect();
    contracts.sort_by(|&a, &b| {
        let ka = Doc(a).get("year").str_or("");
        let kb = Doc(b).get("year").str_or("");
        kb.cmp(ka)
    });

    let mut out = vec!["# Student Contracts".to_string()];

    for contract in contracts {
        let c = Doc(contract);
        let year = c.get("year").str_or("Unknown Year");
        let number = c.get("contractNumber").str_or("Unknown");
        let contract_type = c.get("eduContractTypeName").str_or("Unknown Type");

        out.push(format!("\n## Contract {number} ({year})"));

        out.push("\n### Education Information".to_string());
        for (key, label) in [
            ("eduYear", "Academic Year"),
            ("eduCourse", "Level/Course"),
            ("eduTypeName", "Education Type"),
            ("eduForm", "Education Form"),
        ] {
            if c.get(key).is_truthy() {
                out.push(format!("- {label}: {}", c.get(key).display()));
            }
        }
        if c.get("eduSpecialityName").is_truthy() {
            out.push(format!(
                "- Specialty: {} ({})",
                c.get("eduSpecialityName").display(),
                c.get("eduSpecialityCode").display()
            ));
        }
        if c.get("facultyName").is_truthy() {
            out.push(format!(
                "- Faculty: {} ({})",
                c.get("facultyName").display(),
                c.get("facultyCode").display()
            ));
        }

        out.push("\n### Contract Details".to_string());
        out.push(format!("- Contract Type: {contract_type}"));
        if c.get("eduContractSumTypeName").is_truthy() {
            out.push(format!(
                "- Contract Sum Type: {}",
                c.get("eduContractSumTypeName").display()
            ));
        }

        out.push("\n### Financial Information".to_string());
        for (key, label) in [
            ("contractAmount", "Contract Amount"),
            ("paidAmount", "Paid Amount"),
            ("unPaidAmount", "Unpaid Amount"),
        ] {
            if contract.get(key).is_some() {
                out.push(format!("- {label}: {}", c.get(key).display()));
            }
        }
        for (key, label) in [
            ("contractDebetAmount", "Contract Debt"),
            ("paidCreditAmount", "Paid Credit"),
            ("unPaidCreditAmount", "Unpaid Credit"),
            ("beginRestDebetAmount", "Debt from Previous Year"),
            ("beginRestCreditAmount", "Credit from Previous Year"),
            ("endRestDebetAmount", "Current Year Debt"),
            ("endRestCreditAmount", "Current Year Credit"),
        ] {
            if c.get(key).is_truthy() {
                out.push(format!("- {label}: {}", c.get(key).display()));
            }
        }

        if contract.get("status").is_some() {
            out.push(format!("\n**Status: {}**", c.get("status").display()));
        }
    }

    out.join("\n")
}

pub fn decrees(data: &Value, _args: &ToolArgs) -> String {
    let decrees = Doc(data);
    if !decrees.is_truthy() {
        return "No official decrees found in your student record.".to_string();
    }

    let mut items: Vec<&Value> = decrees.array().iter().collect();
    items.sort_by_key(|&d| std::cmp::Reverse(Doc(d).get("date").i64().unwrap_or(0)));

    let mut out = vec!["# Official Student Decrees".to_string()];

    for decree in items {
        let d = Doc(decree);
        let date = if d.get("date").is_truthy() {
            d.get("date").date()
        } else {
            "Date not specified".to_string()
        };

        out.push(format!("\n## {}", d.get("name").str_or("Unnamed Decree")));
        out.push(format!(
            "- **Decree Number:** {}",
            d.get("number").str_or("Unknown Number")
        ));
        out.push(format!("- **Date:** {date}"));
        out.push(format!(
            "- **Type:** {}",
            d.path(&["decreeType", "name"]).str_or("Unknown Type")
        ));
        out.push(format!(
            "- **Department:** {} ({})",
            d.path(&["department", "name"]).str_or("Unknown Department"),
            d.path(&["department", "code"]).display()
        ));

        let file_url = d.get("file").str_or("");
        if !file_url.is_empty() {
            out.push(format!("- **Document Link:** [Download Decree]({file_url})"));
        }
    }

    out.join("\n")
}

fn push_attributes(out: &mut Vec<String>, attributes: &[Value], heading: &str) {
    if attributes.is_empty() {
        return;
    }
    out.push(heading.to_string());
    for attr in attributes {
        let attr = Doc(attr);
        let label = attr.get("label").str_or("");
        let value = attr.get("value").display();
        if !label.is_empty() && !value.is_empty() {
            out.push(format!("- **{label}:** {value}"));
        }
    }
}

pub fn documents(data: &Value, _args: &ToolArgs) -> String {
    let documents = Doc(data);
    if !documents.is_truthy() {
        return "No official documents found in your student record.".to_string();
    }

    let mut out = vec!["# Official Student Documents".to_string()];

    for document in documents.array() {
        let d = Doc(document);
        out.push(format!("\n## {}", d.get("name").str_or("Unnamed Document")));
        out.push(format!(
            "- **Document Type:** {}",
            d.get("type").str_or("Unknown Type")
        ));

        push_attributes(&mut out, d.get("attributes").array(), "\n### Document Details");

        let file_url = d.get("file").str_or("");
        if !file_url.is_empty() {
            out.push(format!("\n[Download Document]({file_url})"));
        }
    }

    out.join("\n")
}

/// Fixed section labels for the known document types.
fn type_label(doc_type: &str) -> Option<&'static str> {
    Some(match doc_type {
        "diploma" => "Diplomas",
        "supplement" => "Diploma Supplements",
        "academic_sheet" => "Academic Sheets",
        "academic_data" => "Grade Books",
        "reference" => "Student References",
        "decree" => "Academic Orders/Decrees",
        "unknown" => "Other Documents",
        _ => return None,
    })
}

pub fn all_documents(data: &Value, _args: &ToolArgs) -> String {
    let documents = Doc(data);
    if !documents.is_truthy() {
        return "No documents found in your student record.".to_string();
    }

    let mut by_type: std::collections::BTreeMap<&str, Vec<&Value>> =
        std::collections::BTreeMap::new();
    for document in documents.array() {
        let doc_type = Doc(document).get("type").str_or("unknown");
        by_type.entry(doc_type).or_default().push(document);
    }

    let mut out = vec!["# All Student Documents".to_string()];

    for (doc_type, mut docs) in by_type {
        let label = type_label(doc_type)
            .map(str::to_string)
            .unwrap_or_else(|| title_case(doc_type));
        out.push(format!("\n## {label}"));

        docs.sort_by_key(|&d| std::cmp::Reverse(Doc(d).get("id").i64().unwrap_or(0)));

        for document in docs {
            let d = Doc(document);
            out.push(format!("\n### {}", d.get("name").str_or("Unnamed Document")));

            push_attributes(&mut out, d.get("attributes").array(), "\n#### Document Details");

            let file_url = d.get("file").str_or("");
            if !file_url.is_empty() {
                out.push(format!("\n[Download Document]({file_url})"));
            }
            let link_url = d.get("link").str_or("");
            if !link_url.is_empty() && link_url != file_url {
                out.push(format!("\n[View Online]({link_url})"));
            }
        }
    }

    out.join("\n")
}

pub fn references(data: &Value, _args: &ToolArgs) -> String {
    let references = Doc(data);
    if !references.is_truthy() {
        return "No references found in your student record.".to_string();
    }

    let mut items: Vec<&Value> = references.array().iter().collect();
    items.sort_by_key(|&r| std::cmp::Reverse(Doc(r).get("reference_date").i64().unwrap_or(0)));

    let mut out = vec!["# Student References".to_string()];

    for reference in items {
        let r = Doc(reference);
        let date = if r.get("reference_date").is_truthy() {
            r.get("reference_date").date()
        } else {
            "Date not specified".to_string()
        };

        out.push(format!(
            "\n## Reference {}",
            r.get("reference_number").str_or("Unknown Number")
        ));
        out.push(format!("- **Date:** {date}"));
        out.push(format!(
            "- **Department:** {} ({})",
            r.path(&["department", "name"]).str_or("Unknown Department"),
            r.path(&["department", "code"]).display()
        ));
        out.push(format!(
            "- **Academic Year:** {}",
            r.path(&["semester", "education_year", "name"])
                .str_or("Unknown Academic Year")
        ));
        out.push(format!(
            "- **Semester:** {}",
            r.path(&["semester", "name"]).str_or("Unknown Semester")
        ));
        out.push(format!(
            "- **Level:** {}",
            r.path(&["level", "name"]).str_or("Unknown Level")
        ));

        let file_url = r.get("file").str_or("");
        if !file_url.is_empty() {
            out.push(format!("- **Document:** [Download Reference]({file_url})"));
        }
    }

    out.join("\n")
}

pub fn reference_generated(data: &Value, _args: &ToolArgs) -> String {
    let r = Doc(data);
    let mut out = vec!["# Student Reference Generated".to_string()];

    out.push(format!(
        "\n**Reference Number:** {}",
        r.get("reference_number").str_or("Unknown Number")
    ));
    if r.get("reference_date").is_truthy() {
        out.push(format!(
            "**Date Generated:** {}",
            r.get("reference_date").date()
        ));
    }

    out.push("\n## Reference Details".to_string());
    out.push(format!(
        "- **Academic Year:** {}",
        r.path(&["semester", "education_year", "name"])
            .str_or("Unknown Academic Year")
    ));
    out.push(format!(
        "- **Semester:** {}",
        r.path(&["semester", "name"]).str_or("Unknown Semester")
    ));
    out.push(format!(
        "- **Level:** {}",
        r.path(&["level", "name"]).str_or("Unknown Level")
    ));
    out.push(format!(
        "- **Department:** {} ({})",
        r.path(&["department", "name"]).str_or("Unknown Department"),
        r.path(&["department", "code"]).display()
    ));

    let file_url = r.get("file").str_or("");
    if file_url.is_empty() {
        out.push(
            "\n**Note:** Reference document is being processed. Please check your documents list in a few minutes."
                .to_string(),
        );
    } else {
        out.push("\n## Download".to_string());
        out.push(format!("[Download Reference Document]({file_url})"));
    }

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
    fn test_profile_degrades_without_optional_fields() {
        let data = json!({
            "first_name": "Aziz",
            "second_name": "Karimov",
            "third_name": "Anvarovich",
            "student_id_number": "123456",
            "gender": { "name": "Male" },
            "phone": "+998901234567"
        });
        let report = profile(&data, &no_args());
        assert!(report.contains("- Full Name: Aziz Karimov Anvarovich"));
        assert!(!report.contains("Birth Date"));
        assert!(!report.contains("Email"));
        assert!(report.contains("- Country: N/A"));
    }

    #[test]
    fn test_profile_includes_birth_date_when_present() {
        let data = json!({
            "first_name": "Aziz",
            "birth_date": 946684800
        });
        let report = profile(&data, &no_args());
        assert!(report.contains("- Birth Date: 2000-01-01"));
    }

    #[test]
    fn test_contract_list_sorted_year_descending() {
        let data = json!({
            "items": [
                { "year": "2022", "contractNumber": "C-1" },
                { "year": "2024", "contractNumber": "C-3" },
                { "year": "2023", "contractNumber": "C-2" }
            ]
        });
        let report = contract_list(&data, &no_args());
        let p2024 = report.find("Contract C-3 (2024)").unwrap();
        let p2023 = report.find("Contract C-2 (2023)").unwrap();
        let p2022 = report.find("Contract C-1 (2022)").unwrap();
        assert!(p2024 < p2023 && p2023 < p2022);
    }

    #[test]
    fn test_contract_list_empty() {
        let data = json!({ "items": [] });
        assert_eq!(
            contract_list(&data, &no_args()),
            "No contracts found in your student record."
        );
    }

    #[test]
    fn test_all_documents_grouped_and_sorted() {
        let data = json!([
            { "type": "reference", "name": "Ref A", "id": 1 },
            { "type": "diploma", "name": "Diploma", "id": 5 },
            { "type": "reference", "name": "Ref B", "id": 2 }
        ]);
        let report = all_documents(&data, &no_args());
        let diplomas = report.find("## Diplomas").unwrap();
        let refs = report.find("## Student References").unwrap();
        assert!(diplomas < refs);
        // Within a type, newest id first.
        let b = report.find("Ref B").unwrap();
        let a = report.find("Ref A").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_decrees_sorted_date_descending() {
        let data = json!([
            { "name": "Old", "date": 1_600_000_000 },
            { "name": "New", "date": 1_700_000_000 }
        ]);
        let report = decrees(&data, &no_args());
        assert!(report.find("## New").unwrap() < report.find("## Old").unwrap());
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let data = json!([
            { "name": "Old", "date": 1_600_000_000 },
            { "name": "New", "date": 1_700_000_000 }
        ]);
        assert_eq!(decrees(&data, &no_args()), decrees(&data, &no_args()));
    }
}
