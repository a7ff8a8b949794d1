use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::detail;
use crate::models::{ScoreTier, SoftSkill, StudentRecord};
use crate::query::{self, QuerySpec, ResultSummary, SortDirection, SortField, YearFilter};

const TABLE_SKILLS: usize = 3;
const NO_RESULTS: &str = "No students match your filters. Try adjusting your search criteria.";

/// Whole numbers print without a fraction, everything else as-is.
pub fn fmt_score(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn sort_marker(spec: &QuerySpec, field: SortField) -> &'static str {
    if spec.sort_field != Some(field) {
        return "↕";
    }
    match spec.sort_direction {
        SortDirection::Ascending => "↑",
        SortDirection::Descending => "↓",
    }
}

fn skills_cell(skills: &[String]) -> String {
    let mut cell = skills
        .iter()
        .take(TABLE_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if skills.len() > TABLE_SKILLS {
        let _ = write!(cell, " +{}", skills.len() - TABLE_SKILLS);
    }
    cell
}

pub fn describe_query(spec: &QuerySpec) -> String {
    let mut parts = Vec::new();
    let search = spec.search_text.trim();
    if !search.is_empty() {
        parts.push(format!("search \"{search}\""));
    }
    parts.push(format!(
        "major {}",
        spec.major_filter.as_deref().unwrap_or("all")
    ));
    match spec.year_filter {
        YearFilter::All => parts.push("year all".to_string()),
        YearFilter::Year(year) => parts.push(format!("year {year}")),
    }
    parts.push(format!("min match {}%", spec.min_match_score));
    match spec.sort_field {
        Some(field) => parts.push(format!("sorted by {field} {}", spec.sort_direction.as_str())),
        None => parts.push("unsorted".to_string()),
    }
    parts.join(", ")
}

/// `summary` counts every match; `rows` may be a truncated prefix of them.
pub fn render_table(rows: &[&StudentRecord], summary: ResultSummary, spec: &QuerySpec) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{summary}");

    if rows.is_empty() {
        let _ = writeln!(output, "{NO_RESULTS}");
        return output;
    }

    let _ = writeln!(
        output,
        "{:<28} {:>7} {:>6} {:>6} {:>6} {:>6} {:>6}  {:<32} {}",
        "Student",
        format!("Match{}", sort_marker(spec, SortField::MatchScore)),
        format!("Pro{}", sort_marker(spec, SortField::Proactivity)),
        format!("Com{}", sort_marker(spec, SortField::Communication)),
        format!("Pre{}", sort_marker(spec, SortField::PresentationSkills)),
        format!("Rec{}", sort_marker(spec, SortField::RecommendationRate)),
        format!("Year{}", sort_marker(spec, SortField::GraduationYear)),
        "Skills",
        "Profile"
    );

    for student in rows {
        let _ = writeln!(
            output,
            "{:<28} {:>6}% {:>4}/5 {:>4}/5 {:>4}/5 {:>5}% {:>6}  {:<32} {}",
            format!("{} ({})", student.name, student.major),
            fmt_score(student.match_score),
            fmt_score(student.soft_skills.proactivity.score),
            fmt_score(student.soft_skills.communication.score),
            fmt_score(student.soft_skills.presentation_skills.score),
            fmt_score(student.instructor_feedback.recommendation_rate),
            student.graduation_year,
            skills_cell(&student.skills),
            detail::detail_path(&student.id)
        );
    }

    output
}

pub fn render_facets(majors: &[String], years: &[i32]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Majors:");
    if majors.is_empty() {
        let _ = writeln!(output, "  (none)");
    }
    for major in majors {
        let _ = writeln!(output, "  {major}");
    }
    let _ = writeln!(output, "Graduation years:");
    if years.is_empty() {
        let _ = writeln!(output, "  (none)");
    }
    for year in years {
        let _ = writeln!(output, "  {year}");
    }
    output
}

fn write_soft_skill(output: &mut String, label: &str, skill: &SoftSkill) {
    let _ = writeln!(
        output,
        "{label}: {}/5 [{}]",
        fmt_score(skill.score),
        ScoreTier::classify(skill.score, 5.0).as_str()
    );
    let _ = writeln!(output, "  {}", skill.description);
    if let Some(details) = &skill.details {
        let _ = writeln!(output, "  {details}");
    }
    if let Some(traits) = &skill.standout_traits {
        let _ = writeln!(output, "  Standout traits: {}", traits.join(", "));
    }
}

pub fn render_not_found(target: &str) -> String {
    format!("Student not found: {target}\nBack to all students: /\n")
}

pub fn render_profile(student: &StudentRecord) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", student.name);
    let _ = writeln!(output, "{}", student.major);
    let _ = writeln!(
        output,
        "{} · Class of {}",
        student.college, student.graduation_year
    );
    let _ = writeln!(output, "{} | {}", student.email, student.location);
    let _ = writeln!(output, "Photo: {}", student.profile_picture_url);
    let _ = writeln!(
        output,
        "Match Score: {}% [{}]",
        fmt_score(student.match_score),
        ScoreTier::classify(student.match_score, 100.0).as_str()
    );
    if !student.skills.is_empty() {
        let _ = writeln!(output, "Skills: {}", student.skills.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "== Hard Skills");
    let categories = student.hard_skills.categories();
    if categories.is_empty() {
        let _ = writeln!(output, "No hard skill assessments.");
    }
    for (label, category) in categories {
        let _ = writeln!(output, "{label} (portfolio: {})", category.portfolio_url);
        for skill in &category.skills {
            let _ = writeln!(
                output,
                "  {}: {}/5 [{}] {}",
                skill.name,
                fmt_score(skill.score),
                ScoreTier::classify(skill.score, 5.0).as_str(),
                skill.description
            );
        }
    }

    let soft = &student.soft_skills;
    let _ = writeln!(output);
    let _ = writeln!(output, "== Soft Skills");
    write_soft_skill(&mut output, "Proactivity", &soft.proactivity);
    write_soft_skill(&mut output, "Communication", &soft.communication);
    write_soft_skill(&mut output, "Presentation Skills", &soft.presentation_skills);

    let metrics = &student.performance_metrics;
    let _ = writeln!(output);
    let _ = writeln!(output, "== Performance Metrics");
    let _ = writeln!(
        output,
        "Avg. days before deadline: {}",
        fmt_score(metrics.avg_days_before_deadline)
    );
    let _ = writeln!(output, "Attendance rate: {}%", fmt_score(metrics.attendance_rate));
    let _ = writeln!(output, "Engagement score: {}/5", fmt_score(metrics.engagement_score));
    let _ = writeln!(
        output,
        "Messages per course: {}",
        fmt_score(metrics.messages_per_course)
    );
    let _ = writeln!(
        output,
        "Avg. response time: {}h",
        fmt_score(metrics.avg_response_time_hours)
    );
    let _ = writeln!(
        output,
        "Career milestone grade: {}/5",
        fmt_score(metrics.career_milestone_grade)
    );
    let _ = writeln!(
        output,
        "Interviewing grade: {}/5",
        fmt_score(metrics.interviewing_grade)
    );

    let feedback = &student.instructor_feedback;
    let _ = writeln!(output);
    let _ = writeln!(output, "== Instructor Feedback");
    let _ = writeln!(
        output,
        "{}% of instructors would recommend this student to potential employers",
        fmt_score(feedback.recommendation_rate)
    );
    for testimonial in &feedback.testimonials {
        let _ = writeln!(output, "  \"{}\"", testimonial.quote);
        let _ = writeln!(output, "    - {}, {}", testimonial.instructor, testimonial.course);
    }

    output
}

#[derive(Debug, Clone)]
pub struct TierSummary {
    pub tier: ScoreTier,
    pub count: usize,
    pub avg_match: f64,
}

pub fn summarize_by_tier(rows: &[&StudentRecord]) -> Vec<TierSummary> {
    [
        ScoreTier::Excellent,
        ScoreTier::Good,
        ScoreTier::Average,
        ScoreTier::Below,
    ]
    .into_iter()
    .filter_map(|tier| {
        let scores: Vec<f64> = rows
            .iter()
            .filter(|s| ScoreTier::classify(s.match_score, 100.0) == tier)
            .map(|s| s.match_score)
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(TierSummary {
            tier,
            count: scores.len(),
            avg_match: scores.iter().sum::<f64>() / scores.len() as f64,
        })
    })
    .collect()
}

pub fn build_report(
    records: &[StudentRecord],
    spec: &QuerySpec,
    generated_on: NaiveDate,
    limit: usize,
) -> String {
    let rows = query::filter_and_sort(records, spec);
    let summaries = summarize_by_tier(&rows);

    let mut output = String::new();

    let _ = writeln!(output, "# Student Directory Report");
    let _ = writeln!(
        output,
        "Generated {} for {}",
        generated_on,
        describe_query(spec)
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{}",
        ResultSummary {
            shown: rows.len(),
            total: records.len(),
        }
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Match Tiers");

    if summaries.is_empty() {
        let _ = writeln!(output, "{NO_RESULTS}");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students (avg match {:.1}%)",
                summary.tier.as_str(),
                summary.count,
                summary.avg_match
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Students");

    if rows.is_empty() {
        let _ = writeln!(output, "{NO_RESULTS}");
    } else {
        let _ = writeln!(
            output,
            "| Student | Major | Match | Proactivity | Communication | Presentation | Rec. Rate | Grad Year |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for student in rows.iter().take(limit) {
            let _ = writeln!(
                output,
                "| [{}]({}) | {} | {}% | {}/5 | {}/5 | {}/5 | {}% | {} |",
                student.name,
                detail::detail_path(&student.id),
                student.major,
                fmt_score(student.match_score),
                fmt_score(student.soft_skills.proactivity.score),
                fmt_score(student.soft_skills.communication.score),
                fmt_score(student.soft_skills.presentation_skills.score),
                fmt_score(student.instructor_feedback.recommendation_rate),
                student.graduation_year
            );
        }
        if rows.len() > limit {
            let _ = writeln!(output, "\n_{} more not shown._", rows.len() - limit);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Available Filters");
    let majors = query::distinct_majors(records);
    let years: Vec<String> = query::distinct_years(records)
        .iter()
        .map(|year| year.to_string())
        .collect();
    let _ = writeln!(output, "- Majors: {}", majors.join(", "));
    let _ = writeln!(output, "- Graduation years: {}", years.join(", "));

    output
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    major: &'a str,
    college: &'a str,
    graduation_year: i32,
    match_score: f64,
    proactivity: f64,
    communication: f64,
    presentation_skills: f64,
    recommendation_rate: f64,
    skills: String,
}

/// Write the visible rows as CSV, in display order.
pub fn write_csv<W: std::io::Write>(rows: &[&StudentRecord], writer: W) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for student in rows {
        csv_writer.serialize(ExportRow {
            id: &student.id,
            name: &student.name,
            email: &student.email,
            major: &student.major,
            college: &student.college,
            graduation_year: student.graduation_year,
            match_score: student.match_score,
            proactivity: student.soft_skills.proactivity.score,
            communication: student.soft_skills.communication.score,
            presentation_skills: student.soft_skills.presentation_skills.score,
            recommendation_rate: student.instructor_feedback.recommendation_rate,
            skills: student.skills.join("; "),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::student;
    use crate::models::Testimonial;

    fn roster() -> Vec<StudentRecord> {
        vec![
            student("a", "Avery Lee", "CS", 2024, 90.0),
            student("b", "Jules Moreno", "CS", 2025, 40.0),
            student("c", "Kiara Patel", "Art", 2024, 70.0),
        ]
    }

    #[test]
    fn scores_drop_trailing_zero() {
        assert_eq!(fmt_score(92.0), "92");
        assert_eq!(fmt_score(4.5), "4.5");
    }

    #[test]
    fn skills_cell_truncates_after_three() {
        let skills: Vec<String> = ["Python", "SQL", "React", "Go", "Rust"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(skills_cell(&skills), "Python, SQL, React +2");
        assert_eq!(skills_cell(&skills[..2]), "Python, SQL");
    }

    #[test]
    fn table_reports_count_and_links() {
        let records = roster();
        let spec = QuerySpec::default();
        let rows = query::filter_and_sort(&records, &spec);
        let summary = ResultSummary {
            shown: rows.len(),
            total: records.len(),
        };
        let table = render_table(&rows, summary, &spec);
        assert!(table.starts_with("Showing 3 of 3 students"));
        assert!(table.contains("/student/c"));
        assert!(table.contains("Match↓"));
        assert!(table.contains("Pro↕"));
    }

    #[test]
    fn empty_table_shows_hint() {
        let summary = ResultSummary { shown: 0, total: 3 };
        let table = render_table(&[], summary, &QuerySpec::default());
        assert!(table.contains("Showing 0 of 3 students"));
        assert!(table.contains(NO_RESULTS));
    }

    #[test]
    fn truncated_table_still_counts_every_match() {
        let records = roster();
        let rows = query::filter_and_sort(&records, &QuerySpec::default());
        let summary = ResultSummary {
            shown: rows.len(),
            total: records.len(),
        };
        let table = render_table(&rows[..1], summary, &QuerySpec::default());
        assert!(table.starts_with("Showing 3 of 3 students"));
        assert!(table.contains("/student/a"));
        assert!(!table.contains("/student/c"));
    }

    #[test]
    fn profile_includes_optional_sections_when_present() {
        let mut record = student("a", "Avery Lee", "CS", 2024, 90.0);
        record.soft_skills.presentation_skills.standout_traits =
            Some(vec!["Storytelling".to_string()]);
        record.instructor_feedback.testimonials.push(Testimonial {
            quote: "Always prepared".to_string(),
            instructor: "Dr. Ruiz".to_string(),
            course: "Data Structures".to_string(),
        });

        let profile = render_profile(&record);
        assert!(profile.contains("Match Score: 90% [excellent]"));
        assert!(profile.contains("Standout traits: Storytelling"));
        assert!(profile.contains("\"Always prepared\""));
        assert!(profile.contains("No hard skill assessments."));
    }

    #[test]
    fn report_summarizes_filtered_rows() {
        let records = roster();
        let spec = QuerySpec {
            min_match_score: 50,
            ..QuerySpec::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let report = build_report(&records, &spec, date, 10);

        assert!(report.contains("Generated 2026-02-02 for major all, year all, min match 50%"));
        assert!(report.contains("Showing 2 of 3 students"));
        assert!(report.contains("- excellent: 1 students"));
        assert!(report.contains("- average: 1 students"));
        assert!(!report.contains("Jules Moreno"));
        assert!(report.contains("- Majors: Art, CS"));
    }

    #[test]
    fn tiers_skip_empty_buckets() {
        let records = roster();
        let rows: Vec<&StudentRecord> = records.iter().collect();
        let tiers = summarize_by_tier(&rows);
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0].tier, ScoreTier::Excellent);
        assert_eq!(tiers[2].tier, ScoreTier::Below);
    }

    #[test]
    fn csv_keeps_display_order() {
        let records = roster();
        let rows = query::filter_and_sort(&records, &QuerySpec::default());
        let mut buffer = Vec::new();
        write_csv(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("id,name,email"));
        assert!(lines[1].starts_with("a,"));
        assert!(lines[2].starts_with("c,"));
        assert!(lines[3].starts_with("b,"));
    }
}
