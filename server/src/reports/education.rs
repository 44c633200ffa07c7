//! Reports over the education endpoints: grades, schedules, attendance,
//! tasks, and per-subject detail.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hemis_api::Doc;
use serde_json::Value;

use super::{location, push_file_lines, time_range, value_or_na};
use crate::registry::ToolArgs;

pub fn gpa_list(data: &Value, _args: &ToolArgs) -> String {
    let records = Doc(data);
    let mut out = vec!["# GPA History".to_string()];

    if !records.is_truthy() {
        out.push("\nNo GPA records found.".to_string());
        return out.join("\n");
    }

    let mut items: Vec<&Value> = records.array().iter().collect();
    items.sort_by(|&a, &b| {
        let ka = Doc(a).path(&["educationYear", "code"]).display();
        let kb = Doc(b).path(&["educationYear", "code"]).display();
        kb.cmp(&ka)
    });

    for record in items {
        let r = Doc(record);
        out.push(format!(
            "\n## {} ({})",
            value_or_na(r.path(&["educationYear", "name"])),
            value_or_na(r.path(&["level", "name"]))
        ));
        out.push(format!("- GPA: {}", r.get("gpa").display()));
        out.push(format!(
            "- Total Credits: {}",
            r.get("credit_sum").display()
        ));
        out.push(format!("- Subjects: {}", r.get("subjects").display()));

        if r.get("debt_subjects").i64().unwrap_or(0) > 0 {
            out.push(format!(
                "- Debt Subjects: {}",
                r.get("debt_subjects").display()
            ));
        }

        if r.get("can_transfer").is_truthy() {
            out.push("- Eligible for transfer to next course: Yes".to_string());
        } else {
            out.push("- Eligible for transfer to next course: No".to_string());
        }

        match r.get("method").str_or("") {
            "one_year" => out.push("- Calculation method: One year".to_string()),
            "all_year" => out.push("- Calculation method: All years".to_string()),
            _ => {}
        }
    }

    out.join("\n")
}

pub fn semesters(data: &Value, _args: &ToolArgs) -> String {
    let semesters = Doc(data);
    let mut out = vec!["# Academic Semester History".to_string()];

    if !semesters.is_truthy() {
        out.push("\nNo semester records found.".to_string());
        return out.join("\n");
    }

    let mut items: Vec<&Value> = semesters.array().iter().collect();
    items.sort_by(|&a, &b| {
        let ka = (
            Doc(a).path(&["education_year", "code"]).display(),
            Doc(a).get("code").display(),
        );
        let kb = (
            Doc(b).path(&["education_year", "code"]).display(),
            Doc(b).get("code").display(),
        );
        ka.cmp(&kb)
    });

    let mut current_year: Option<String> = None;
    for semester in items {
        let s = Doc(semester);
        let year = s.path(&["education_year", "name"]).display();

        if current_year.as_deref() != Some(year.as_str()) {
            out.push(format!("\n## Academic Year: {year}"));
            if s.path(&["education_year", "current"]).is_truthy() {
                out.push("*Current academic year*".to_string());
            }
            current_year = Some(year);
        }

        out.push(format!("\n### Semester code: {}", s.get("code").display()));

        if s.get("current").is_truthy() {
            out.push("**Current semester**".to_string());
        }

        let weeks = s.get("weeks").array();
        if !weeks.is_empty() {
            let first_start = weeks
                .iter()
                .map(|w| Doc(w).get("start_date").i64().unwrap_or(i64::MAX))
                .min()
                .unwrap_or(0);
            let last_end = weeks
                .iter()
                .map(|w| Doc(w).get("end_date").i64().unwrap_or(i64::MIN))
                .max()
                .unwrap_or(0);

            out.push(format!("- Start Date: {}", unix_date(first_start)));
            out.push(format!("- End Date: {}", unix_date(last_end)));
            out.push(format!("- Number of Weeks: {}", weeks.len()));

            if let Some(current) = weeks.iter().find(|&w| Doc(w).get("current").is_truthy()) {
                let w = Doc(current);
                out.push(format!(
                    "- Current Week: {} to {}",
                    w.get("start_date_f").display(),
                    w.get("end_date_f").display()
                ));
            }
        }
    }

    out.join("\n")
}

pub fn subjects_with_grades(data: &Value, args: &ToolArgs) -> String {
    let semester = args.get("semester").unwrap_or("");
    let subjects = Doc(data);
    let mut out = vec![format!("# Subject List for Semester {semester}")];

    if !subjects.is_truthy() {
        out.push("\nNo subjects found for this semester.".to_string());
        return out.join("\n");
    }

    let total_credits: f64 = subjects
        .array()
        .iter()
        .map(|s| Doc(s).path(&["curriculumSubject", "credit"]).f64().unwrap_or(0.0))
        .sum();
    out.push(format!(
        "\n**Total Credits:** {}\n",
        super::fmt_number(total_credits)
    ));

    let mut items: Vec<&Value> = subjects.array().iter().collect();
    items.sort_by_key(|&s| {
        Doc(s)
            .path(&["curriculumSubject", "subject", "name"])
            .display()
    });

    for subject in items {
        let s = Doc(subject);
        let curriculum = s.get("curriculumSubject");
        let subject_data = curriculum.get("subject");

        out.push(format!(
            "## {} ({})",
            subject_data.get("name").display(),
            subject_data.get("code").display()
        ));
        out.push(format!(
            "- Subject Type: {}",
            curriculum.path(&["subjectType", "name"]).display()
        ));
        out.push(format!(
            "- Credit Hours: {}",
            curriculum.get("credit").display()
        ));
        out.push(format!(
            "- Total Academic Load: {} hours",
            curriculum.get("total_acload").display()
        ));

        let overall = s.get("overallScore");
        if overall.is_truthy() {
            out.push(format!(
                "- **Grade: {} / {} ({}%)**",
                overall.get("grade").display(),
                overall.get("max_ball").display(),
                overall.get("percent").display()
            ));
            out.push(format!(
                "- Exam Type: {}",
                overall.path(&["examType", "name"]).display()
            ));
        }

        let exams = s.get("gradesByExam").array();
        if !exams.is_empty() {
            out.push("\n### Exam Grades".to_string());
            for exam in exams {
                let e = Doc(exam);
                out.push(format!(
                    "- {}: {} / {} ({}%)",
                    e.path(&["examType", "name"]).display(),
                    e.get("grade").display(),
                    e.get("max_ball").display(),
                    e.get("percent").display()
                ));
            }
        }

        out.push(String::new());
    }

    out.join("\n")
}

pub fn subjects_list(data: &Value, args: &ToolArgs) -> String {
    let semester = args.get("semester").unwrap_or("");
    let subjects = Doc(data);
    let mut out = vec![format!("# Subject List for Semester {semester}")];

    if !subjects.is_truthy() {
        out.push("\nNo subjects found for this semester.".to_string());
        return out.join("\n");
    }

    let total_credits: f64 = subjects
        .array()
        .iter()
        .map(|s| Doc(s).get("credit").f64().unwrap_or(0.0))
        .sum();
    let total_hours: f64 = subjects
        .array()
        .iter()
        .map(|s| Doc(s).get("total_acload").f64().unwrap_or(0.0))
        .sum();
    out.push(format!(
        "\n**Total Credits:** {}",
        super::fmt_number(total_credits)
    ));
    out.push(format!(
        "**Total Academic Hours:** {}\n",
        super::fmt_number(total_hours)
    ));

    let mut items: Vec<&Value> = subjects.array().iter().collect();
    items.sort_by_key(|&s| Doc(s).path(&["subject", "name"]).display());

    for subject in items {
        let s = Doc(subject);
        let subject_data = s.get("subject");
        let subject_type = s.get("subjectType");

        out.push(format!(
            "## {} ({})",
            subject_data.get("name").display(),
            subject_data.get("code").display()
        ));
        out.push(format!(
            "- Subject ID: {}",
            subject_data.get("id").display()
        ));
        out.push(format!(
            "- Subject Type: {} ({})",
            subject_type.get("name").display(),
            subject_type.get("code").display()
        ));
        out.push(format!("- Credit Hours: {}", s.get("credit").display()));
        out.push(format!(
            "- Total Academic Load: {} hours",
            s.get("total_acload").display()
        ));
        out.push(String::new());
    }

    out.join("\n")
}

fn is_absent(record: Doc) -> bool {
    record.get("absent_on").is_truthy() || record.get("absent_off").is_truthy()
}

pub fn attendance(data: &Value, _args: &ToolArgs) -> String {
    let all = Doc(data).array();
    let Some(first) = all.first() else {
        return "No attendance records found for this subject in the specified semester."
            .to_string();
    };

    let subject = Doc(first).get("subject");
    let mut out = vec![format!(
        "# Attendance for {} ({})",
        subject.get("name").str_or("Unknown Subject"),
        subject.get("code").display()
    )];

    let total = all.len();
    let absences = all.iter().filter(|&r| is_absent(Doc(r))).count();
    let excused = all
        .iter()
        .filter(|&r| is_absent(Doc(r)) && Doc(r).get("explicable").is_truthy())
        .count();
    let rate = (total - absences) as f64 / total as f64 * 100.0;

    out.push(format!("\n**Total Lessons:** {total}"));
    out.push(format!("**Absences:** {absences}"));
    out.push(format!("**Excused Absences:** {excused}"));
    out.push(format!("**Attendance Rate:** {rate:.1}%"));

    let mut items: Vec<&Value> = all.iter().collect();
    items.sort_by_key(|&r| Doc(r).get("lesson_date").i64().unwrap_or(0));

    out.push("\n## Attendance Records".to_string());

    for record in items {
        let r = Doc(record);
        let date = if r.get("lesson_date").is_truthy() {
            r.get("lesson_date").date()
        } else {
            "Unknown Date".to_string()
        };
        let training_type = r.path(&["trainingType", "name"]).str_or("Unknown Type");
        let time_info = time_range(r.get("lessonPair"), "Unknown time");
        let instructor = r.path(&["employee", "name"]).str_or("Unknown Instructor");

        let status = if is_absent(r) {
            if r.get("explicable").is_truthy() {
                "Excused Absence"
            } else {
                "Unexcused Absence"
            }
        } else {
            "Present"
        };

        out.push(format!("- **{date}** ({training_type}, {time_info})"));
        out.push(format!("  - Instructor: {instructor}"));
        out.push(format!("  - Status: {status}"));
    }

    out.join("\n")
}

pub fn exams(data: &Value, args: &ToolArgs) -> String {
    let semester = args.get("semester").unwrap_or("");
    let records = Doc(data);
    let mut out = vec![format!("# Exam Schedule for Semester {semester}")];

    if !records.is_truthy() {
        out.push("\nNo exams scheduled for this semester.".to_string());
        return out.join("\n");
    }

    let mut items: Vec<&Value> = records.array().iter().collect();
    items.sort_by_key(|&e| Doc(e).get("examDate").i64().unwrap_or(0));

    let Some(&first_exam) = items.first() else {
        out.push("\nNo exams scheduled for this semester.".to_string());
        return out.join("\n");
    };
    let first = Doc(first_exam);
    out.push(format!(
        "\nAcademic Year: **{}**",
        first
            .path(&["educationYear", "name"])
            .str_or("Unknown Academic Year")
    ));
    out.push(format!(
        "Group: **{}**",
        first.path(&["group", "name"]).str_or("Unknown Group")
    ));

    out.push("\n## Scheduled Exams".to_string());

    for exam in items {
        let e = Doc(exam);
        let date = if e.get("examDate").is_truthy() {
            e.get("examDate").date()
        } else {
            "Date not specified".to_string()
        };
        let time_info = time_range(e.get("lessonPair"), "Time not specified");

        out.push(format!(
            "\n### {} ({})",
            e.path(&["subject", "name"]).str_or("Unknown Subject"),
            e.path(&["subject", "code"]).display()
        ));
        out.push(format!("- **Date:** {date}"));
        out.push(format!("- **Time:** {time_info}"));
        out.push(format!(
            "- **Exam Type:** {}",
            e.path(&["examType", "name"]).str_or("Unknown Type")
        ));
        let final_type = e.path(&["finalExamType", "name"]).str_or("");
        if !final_type.is_empty() {
            out.push(format!("- **Final Exam Type:** {final_type}"));
        }
        out.push(format!(
            "- **Instructor:** {}",
            e.path(&["employee", "name"]).str_or("Not specified")
        ));
        out.push(format!("- **Location:** {}", location(e.get("auditorium"))));

        let department = e.path(&["department", "name"]).str_or("");
        if !department.is_empty() {
            out.push(format!("- **Department:** {department}"));
        }
        let faculty = e.path(&["faculty", "name"]).str_or("");
        if !faculty.is_empty() {
            out.push(format!("- **Faculty:** {faculty}"));
        }
    }

    out.join("\n")
}

pub fn performance(data: &Value, _args: &ToolArgs) -> String {
    let p = Doc(data);
    if !p.is_truthy() {
        return "No performance data found for this subject in the specified semester."
            .to_string();
    }

    let mut out = vec![format!(
        "# Performance for {} ({})",
        p.path(&["subject", "name"]).str_or("Unknown Subject"),
        p.path(&["subject", "code"]).display()
    )];

    out.push("\n## Subject Information".to_string());
    out.push(format!(
        "- Subject Type: {}",
        p.path(&["subjectType", "name"]).str_or("Unknown Type")
    ));
    out.push(format!(
        "- Credit Hours: {}",
        p.get("credit").display()
    ));
    if p.get("total_acload").is_truthy() {
        out.push(format!(
            "- Total Academic Load: {} hours",
            p.get("total_acload").display()
        ));
    }

    out.push("\n## Task Statistics".to_string());
    out.push(format!(
        "- Total Tasks: {}",
        p.get("tasks_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Submitted Tasks: {}",
        p.get("submits_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Marked Tasks: {}",
        p.get("marked_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Available Resources: {}",
        p.get("resources_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Absences: {}",
        p.get("absent_count").i64().unwrap_or(0)
    ));

    let tasks = p.get("tasks").array();
    if tasks.is_empty() {
        out.push("\nNo tasks assigned for this subject.".to_string());
        return out.join("\n");
    }

    out.push("\n## Task Details".to_string());

    let mut items: Vec<&Value> = tasks.iter().collect();
    items.sort_by_key(|&t| Doc(t).get("deadline").i64().unwrap_or(0));

    for task in items {
        let t = Doc(task);
        out.push(format!("\n### {}", t.get("name").str_or("Unnamed Task")));

        let training_type = t.path(&["trainingType", "name"]).str_or("");
        if !training_type.is_empty() {
            out.push(format!("- Training Type: {training_type}"));
        }
        let task_type = t.path(&["taskType", "name"]).str_or("");
        if !task_type.is_empty() {
            out.push(format!("- Task Type: {task_type}"));
        }
        if !t.get("max_ball").0.is_null() {
            out.push(format!("- Maximum Score: {}", t.get("max_ball").display()));
        }
        if t.get("deadline").is_truthy() {
            out.push(format!("- Deadline: {}", t.get("deadline").datetime()));
        }
        if t.get("attempt_limit").is_truthy() {
            out.push(format!(
                "- Attempt Limit: {}",
                t.get("attempt_limit").display()
            ));
        }
        let status = t.path(&["taskStatus", "name"]).str_or("");
        if !status.is_empty() {
            out.push(format!("- Status: {status}"));
        }
        let employee = t.path(&["employee", "name"]).str_or("");
        if !employee.is_empty() {
            out.push(format!("- Instructor: {employee}"));
        }
        if t.get("comment").is_truthy() {
            out.push(format!("- Comment: {}", t.get("comment").display()));
        }

        let files = t.get("files").array();
        if !files.is_empty() {
            out.push("\n#### Attached Files:".to_string());
            push_file_lines(&mut out, files);
        }
    }

    out.join("\n")
}

pub fn resources(data: &Value, args: &ToolArgs) -> String {
    let resources = Doc(data);
    if !resources.is_truthy() {
        return "No electronic resources found for this subject in the specified semester."
            .to_string();
    }

    let subject = args.get("subject").unwrap_or("");
    let semester = args.get("semester").unwrap_or("");
    let mut out = vec![format!(
        "# Electronic Resources for Subject #{subject} in Semester #{semester}"
    )];

    let mut items: Vec<&Value> = resources.array().iter().collect();
    items.sort_by_key(|&r| std::cmp::Reverse(Doc(r).get("updated_at").i64().unwrap_or(0)));

    for resource in items {
        let r = Doc(resource);
        out.push(format!("\n## {}", r.get("title").str_or("Untitled Resource")));

        if r.get("comment").is_truthy() {
            out.push(format!("\n{}", r.get("comment").display()));
        }

        let training_type = r.path(&["trainingType", "name"]).str_or("");
        if !training_type.is_empty() {
            out.push(format!("\n**Training Type:** {training_type}"));
        }
        let instructor = r.path(&["employee", "name"]).str_or("");
        if !instructor.is_empty() {
            out.push(format!("**Instructor:** {instructor}"));
        }
        if r.get("updated_at").is_truthy() {
            out.push(format!("**Updated:** {}", r.get("updated_at").datetime()));
        }

        let url = r.get("url").str_or("");
        if !url.is_empty() {
            out.push(format!("\n[Access Online Resource]({url})"));
        }

        let files = r.get("files").array();
        if !files.is_empty() {
            out.push("\n### Attached Files".to_string());
            push_file_lines(&mut out, files);
        }

        out.push(String::new());
    }

    out.join("\n")
}

fn unix_date(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn schedule(data: &Value, args: &ToolArgs) -> String {
    let schedule = Doc(data);
    if !schedule.is_truthy() {
        return "No schedule found for the specified semester and week.".to_string();
    }

    let semester = args.get("semester").unwrap_or("");
    let mut out = vec![format!("# Class Schedule for Semester {semester}")];

    let mut items: Vec<&Value> = schedule.array().iter().collect();
    items.sort_by_key(|&l| {
        (
            Doc(l).get("lesson_date").i64().unwrap_or(0),
            Doc(l).path(&["lessonPair", "code"]).display(),
        )
    });

    let Some(&first_lesson) = items.first() else {
        out.push("\nNo scheduled classes found for this period.".to_string());
        return out.join("\n");
    };
    let first = Doc(first_lesson);
    if first.get("weekStartTime").is_truthy() && first.get("weekEndTime").is_truthy() {
        out.push(format!(
            "\nWeek: **{}** to **{}**",
            first.get("weekStartTime").date(),
            first.get("weekEndTime").date()
        ));
    }

    // Group by calendar day; the sort above keeps days and pairs in order.
    let mut by_day: BTreeMap<chrono::NaiveDate, Vec<&Value>> = BTreeMap::new();
    for &lesson in &items {
        let ts = Doc(lesson).get("lesson_date").i64().unwrap_or(0);
        if ts == 0 {
            continue;
        }
        if let Some(dt) = DateTime::<Utc>::from_timestamp(ts, 0) {
            by_day.entry(dt.date_naive()).or_default().push(lesson);
        }
    }

    if by_day.is_empty() {
        out.push("\nNo scheduled classes found for this period.".to_string());
        return out.join("\n");
    }

    for (day, lessons) in &by_day {
        out.push(format!("\n## {} ({})", day.format("%A"), day.format("%Y-%m-%d")));

        for lesson in lessons {
            let l = Doc(lesson);
            let time_info = time_range(l.get("lessonPair"), "Time not specified");

            out.push(format!(
                "\n### {time_info} - {} ({})",
                l.path(&["subject", "name"]).str_or("Unknown Subject"),
                l.path(&["subject", "code"]).display()
            ));
            out.push(format!(
                "- **Type:** {}",
                l.path(&["trainingType", "name"]).str_or("Unknown Type")
            ));
            out.push(format!(
                "- **Instructor:** {}",
                l.path(&["employee", "name"]).str_or("Not specified")
            ));
            out.push(format!("- **Location:** {}", location(l.get("auditorium"))));

            let group = l.path(&["group", "name"]).str_or("");
            if !group.is_empty() {
                out.push(format!("- **Group:** {group}"));
            }
        }
    }

    out.join("\n")
}

pub fn subject_details(data: &Value, _args: &ToolArgs) -> String {
    let s = Doc(data);
    if !s.is_truthy() {
        return "No details found for this subject in the specified semester.".to_string();
    }

    let mut out = Vec::new();

    let subject = s.get("subject");
    out.push(format!(
        "# {} ({})",
        subject.get("name").str_or("Unknown Subject"),
        subject.get("code").display()
    ));
    out.push("\n## General Information".to_string());
    out.push(format!("- Subject ID: {}", subject.get("id").display()));
    out.push(format!(
        "- Type: {} ({})",
        s.path(&["subjectType", "name"]).str_or("Unknown Type"),
        s.path(&["subjectType", "code"]).display()
    ));
    out.push(format!(
        "- Total Academic Load: {} hours",
        s.get("total_acload").display()
    ));
    out.push(format!("- Credit Hours: {}", s.get("credit").display()));

    let max_ball = s.get("max_ball").f64().unwrap_or(0.0);
    let student_ball = s.get("student_ball").f64().unwrap_or(0.0);
    if max_ball != 0.0 {
        out.push("\n## Grading Information".to_string());
        out.push(format!("- Maximum Score: {}", s.get("max_ball").display()));
        out.push(format!(
            "- Subject Score: {}",
            s.get("subject_ball").display()
        ));
        out.push(format!("- Your Score: {}", s.get("student_ball").display()));
        if max_ball > 0.0 && student_ball > 0.0 {
            out.push(format!(
                "- Percentage: {:.2}%",
                student_ball / max_ball * 100.0
            ));
        }
    }

    out.push("\n## Activity Statistics".to_string());
    out.push(format!(
        "- Total Tasks: {}",
        s.get("tasks_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Submitted Tasks: {}",
        s.get("submits_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Marked Tasks: {}",
        s.get("marked_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Available Resources: {}",
        s.get("resources_count").i64().unwrap_or(0)
    ));
    out.push(format!(
        "- Absences: {}",
        s.get("absent_count").i64().unwrap_or(0)
    ));

    let grades = s.get("grades").array();
    if !grades.is_empty() {
        out.push("\n## Detailed Grades".to_string());
        for grade in grades {
            let g = Doc(grade);
            let name = g.get("name").str_or("Unknown Assessment");
            let value = g.get("grade").f64().unwrap_or(0.0);
            let max = g.get("max_ball").f64().unwrap_or(0.0);
            if max > 0.0 {
                out.push(format!(
                    "- {name}: {} / {} ({:.2}%)",
                    g.get("grade").display(),
                    g.get("max_ball").display(),
                    value / max * 100.0
                ));
            } else {
                out.push(format!(
                    "- {name}: {} / {}",
                    g.get("grade").display(),
                    g.get("max_ball").display()
                ));
            }
        }
    }

    let tasks = s.get("tasks").array();
    if tasks.is_empty() {
        out.push("\nNo tasks have been assigned for this subject yet.".to_string());
        return out.join("\n");
    }

    out.push("\n## Tasks".to_string());
    for task in tasks {
        let t = Doc(task);
        out.push(format!("\n### {}", t.get("name").str_or("Unnamed Task")));

        let task_type = t.path(&["taskType", "name"]).str_or("");
        if !task_type.is_empty() {
            out.push(format!("- Type: {task_type}"));
        }
        if t.get("deadline").is_truthy() {
            out.push(format!("- Deadline: {}", t.get("deadline").datetime()));
        }
        let task_max = t.get("max_ball");
        if !task_max.0.is_null() {
            out.push(format!("- Maximum Score: {}", task_max.display()));
        }
        let grade = t.get("grade");
        if !grade.0.is_null() {
            out.push(format!("- Your Score: {}", grade.display()));
            let max = task_max.f64().unwrap_or(0.0);
            if max > 0.0 {
                out.push(format!(
                    "- Percentage: {:.2}%",
                    grade.f64().unwrap_or(0.0) / max * 100.0
                ));
            }
        }
        let status = t.path(&["taskStatus", "name"]).str_or("");
        if !status.is_empty() {
            out.push(format!("- Status: {status}"));
        }
    }

    out.join("\n")
}

pub fn task_list(data: &Value, args: &ToolArgs) -> String {
    let semester = args.get("semester").unwrap_or("");
    let tasks = Doc(data);
    let mut out = vec![format!("# Tasks List for Semester {semester}")];

    if !tasks.is_truthy() {
        out.push("\nNo tasks found for this semester.".to_string());
        return out.join("\n");
    }

    // Undated tasks sort last.
    let mut items: Vec<&Value> = tasks.array().iter().collect();
    items.sort_by_key(|&t| {
        let deadline = Doc(t).get("deadline").i64().unwrap_or(0);
        if deadline == 0 {
            i64::MAX
        } else {
            deadline
        }
    });

    for &task in &items {
        let t = Doc(task);
        out.push(format!("\n## {}", t.get("name").str_or("Unnamed Task")));

        if t.get("comment").is_truthy() {
            out.push(format!("\n{}", t.get("comment").display()));
        }

        let training_type = t.path(&["trainingType", "name"]).str_or("");
        if !training_type.is_empty() {
            out.push(format!("\n- **Training Type:** {training_type}"));
        }
        let task_type = t.path(&["taskType", "name"]).str_or("");
        if !task_type.is_empty() {
            out.push(format!("- **Task Type:** {task_type}"));
        }
        if !t.get("max_ball").0.is_null() {
            out.push(format!(
                "- **Maximum Score:** {}",
                t.get("max_ball").display()
            ));
        }
        if t.get("deadline").is_truthy() {
            out.push(format!("- **Deadline:** {}", t.get("deadline").datetime()));
        }
        if t.get("attempt_limit").is_truthy() {
            out.push(format!(
                "- **Attempt Limit:** {}",
                t.get("attempt_limit").display()
            ));
        }
        let status = t.path(&["taskStatus", "name"]).str_or("");
        if !status.is_empty() {
            out.push(format!("- **Status:** {status}"));
        }
        let instructor = t.path(&["employee", "name"]).str_or("");
        if !instructor.is_empty() {
            out.push(format!("- **Instructor:** {instructor}"));
        }
        if t.get("updated_at").is_truthy() {
            out.push(format!(
                "- **Last Updated:** {}",
                t.get("updated_at").datetime()
            ));
        }

        let files = t.get("files").array();
        if !files.is_empty() {
            out.push("\n### Attached Files".to_string());
            push_file_lines(&mut out, files);
        }
    }

    let page = args.i64_or("page", 0);
    out.push(format!(
        "\n---\n**Page {}** (showing {} tasks)",
        page + 1,
        items.len()
    ));
    out.push(format!("To see more tasks, use page={}", page + 1));

    out.join("\n")
}
