use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::error::LoadError;
use crate::models::{StudentRecord, StudentsDocument};

const SEED_ROSTER: &str = include_str!("../data/students.json");

/// An out-of-domain value found while loading. Tolerated, only reported.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainWarning {
    pub student_id: String,
    pub field: String,
    pub value: f64,
    pub max: f64,
}

/// The loaded roster. Immutable for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<StudentRecord>) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(LoadError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    pub fn from_json(document: &str) -> Result<Self, LoadError> {
        let doc: StudentsDocument = serde_json::from_str(document)?;
        let store = Self::new(doc.students)?;
        for warning in store.validate() {
            warn!(
                student = %warning.student_id,
                field = %warning.field,
                value = warning.value,
                max = warning.max,
                "value outside its domain"
            );
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let document = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&document)?;
        info!(path = %path.display(), records = store.len(), "roster loaded");
        Ok(store)
    }

    /// The roster bundled with the binary.
    pub fn seed() -> Result<Self, LoadError> {
        let store = Self::from_json(SEED_ROSTER)?;
        info!(records = store.len(), "seed roster loaded");
        Ok(store)
    }

    /// Every record, in load order.
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StudentRecord> {
        find_by_id(&self.records, id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collect numeric values that are negative or above their domain maximum.
    pub fn validate(&self) -> Vec<DomainWarning> {
        let mut warnings = Vec::new();

        for record in &self.records {
            let mut check = |field: String, value: f64, max: f64| {
                if !(0.0..=max).contains(&value) {
                    warnings.push(DomainWarning {
                        student_id: record.id.clone(),
                        field,
                        value,
                        max,
                    });
                }
            };

            check("matchScore".to_string(), record.match_score, 100.0);
            check(
                "instructorFeedback.recommendationRate".to_string(),
                record.instructor_feedback.recommendation_rate,
                100.0,
            );
            check(
                "performanceMetrics.attendanceRate".to_string(),
                record.performance_metrics.attendance_rate,
                100.0,
            );

            let soft = &record.soft_skills;
            for (name, skill) in [
                ("proactivity", &soft.proactivity),
                ("communication", &soft.communication),
                ("presentationSkills", &soft.presentation_skills),
            ] {
                check(format!("softSkills.{name}.score"), skill.score, 5.0);
            }

            for (label, category) in record.hard_skills.categories() {
                for skill in &category.skills {
                    check(format!("hardSkills.{label}.{}", skill.name), skill.score, 5.0);
                }
            }
        }

        warnings
    }
}

pub fn find_by_id<'a>(records: &'a [StudentRecord], id: &str) -> Option<&'a StudentRecord> {
    records.iter().find(|record| record.id == id)
}
