use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub location: String,
    #[serde(rename = "profilePicture")]
    pub profile_picture_url: String,
    pub major: String,
    pub college: String,
    pub graduation_year: i32,
    pub match_score: f64,
    pub performance_metrics: PerformanceMetrics,
    pub soft_skills: SoftSkills,
    pub hard_skills: HardSkills,
    pub instructor_feedback: InstructorFeedback,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub avg_days_before_deadline: f64,
    /// Percentage, 0-100.
    pub attendance_rate: f64,
    /// Out of 5.
    pub engagement_score: f64,
    pub messages_per_course: f64,
    pub avg_response_time_hours: f64,
    /// Out of 5.
    pub career_milestone_grade: f64,
    /// Out of 5.
    pub interviewing_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkills {
    pub proactivity: SoftSkill,
    pub communication: SoftSkill,
    pub presentation_skills: SoftSkill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftSkill {
    pub score: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standout_traits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardSkills {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_science: Option<SkillCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_science: Option<SkillCategory>,
}

impl HardSkills {
    /// Present categories with their display labels, computer science first.
    pub fn categories(&self) -> Vec<(&'static str, &SkillCategory)> {
        let mut out = Vec::new();
        if let Some(category) = &self.computer_science {
            out.push(("Computer Science", category));
        }
        if let Some(category) = &self.data_science {
            out.push(("Data Science", category));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub portfolio_url: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorFeedback {
    pub recommendation_rate: f64,
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub instructor: String,
    pub course: String,
}

/// Top-level shape of a roster document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentsDocument {
    pub students: Vec<StudentRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    Average,
    Below,
}

impl ScoreTier {
    /// Classify `score` by its percentage of `max`.
    pub fn classify(score: f64, max: f64) -> Self {
        let percentage = if max > 0.0 { score / max * 100.0 } else { 0.0 };
        if percentage >= 90.0 {
            ScoreTier::Excellent
        } else if percentage >= 75.0 {
            ScoreTier::Good
        } else if percentage >= 60.0 {
            ScoreTier::Average
        } else {
            ScoreTier::Below
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "excellent",
            ScoreTier::Good => "good",
            ScoreTier::Average => "average",
            ScoreTier::Below => "below",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_percentage_thresholds() {
        assert_eq!(ScoreTier::classify(4.5, 5.0), ScoreTier::Excellent);
        assert_eq!(ScoreTier::classify(4.0, 5.0), ScoreTier::Good);
        assert_eq!(ScoreTier::classify(60.0, 100.0), ScoreTier::Average);
        assert_eq!(ScoreTier::classify(59.0, 100.0), ScoreTier::Below);
    }

    #[test]
    fn deserializes_camel_case_document() {
        let json = r#"{
            "students": [{
                "id": "s1",
                "name": "Maya Chen",
                "email": "maya@example.com",
                "location": "Denver, CO",
                "profilePicture": "https://example.com/maya.png",
                "major": "Computer Science",
                "college": "CU Boulder",
                "graduationYear": 2025,
                "matchScore": 92,
                "performanceMetrics": {
                    "avgDaysBeforeDeadline": 2.1,
                    "attendanceRate": 98,
                    "engagementScore": 4.7,
                    "messagesPerCourse": 14,
                    "avgResponseTimeHours": 2.5,
                    "careerMilestoneGrade": 4.5,
                    "interviewingGrade": 4.2
                },
                "softSkills": {
                    "proactivity": { "score": 4.8, "description": "Starts early" },
                    "communication": { "score": 4.5, "description": "Clear", "details": "Writes weekly updates" },
                    "presentationSkills": { "score": 4.0, "description": "Confident", "standoutTraits": ["Storytelling"] }
                },
                "hardSkills": {
                    "dataScience": { "portfolioUrl": "https://example.com/p", "skills": [
                        { "name": "SQL", "score": 4, "description": "Joins and windows" }
                    ] }
                },
                "instructorFeedback": { "recommendationRate": 95, "testimonials": [] },
                "skills": ["Python", "SQL"]
            }]
        }"#;

        let doc: StudentsDocument = serde_json::from_str(json).unwrap();
        let student = &doc.students[0];
        assert_eq!(student.profile_picture_url, "https://example.com/maya.png");
        assert_eq!(student.graduation_year, 2025);
        assert!(student.hard_skills.computer_science.is_none());
        assert_eq!(student.hard_skills.categories().len(), 1);
        assert_eq!(
            student.soft_skills.presentation_skills.standout_traits,
            Some(vec!["Storytelling".to_string()])
        );
    }

    #[test]
    fn missing_required_field_fails() {
        let json = r#"{ "students": [{ "id": "s1", "name": "No Email" }] }"#;
        assert!(serde_json::from_str::<StudentsDocument>(json).is_err());
    }
}
