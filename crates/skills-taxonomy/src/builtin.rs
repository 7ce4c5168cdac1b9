//! Default taxonomy shipped with the service

use crate::taxonomy::{Section, Taxonomy, TaxonomyConfig};

const SECTIONS: &[(&str, &str, &[&str])] = &[
    (
        "programming",
        "Programming",
        &["Python", "Java", "C", "C++", "C#", "JavaScript", "TypeScript", "Go"],
    ),
    (
        "data-analytics",
        "Data Analytics",
        &["SQL", "Excel", "Power BI", "Tableau", "Pandas", "Statistics"],
    ),
    (
        "ai-dl",
        "AI/DL",
        &[
            "Machine Learning",
            "Deep Learning",
            "TensorFlow",
            "PyTorch",
            "Computer Vision",
            "NLP",
        ],
    ),
    (
        "frontend",
        "Frontend Development",
        &["HTML", "CSS", "React", "Angular", "Vue.js"],
    ),
    (
        "backend",
        "Backend Development",
        &["Node.js", "Express", "Django", "Flask", "Spring Boot", "REST APIs"],
    ),
    (
        "devops",
        "DevOps",
        &["Git", "Docker", "Kubernetes", "Jenkins", "CI/CD", "Terraform"],
    ),
    (
        "adas",
        "ADAS",
        &[
            "Sensor Fusion",
            "AUTOSAR",
            "ISO 26262",
            "CAN Bus",
            "MATLAB/Simulink",
            "ROS",
        ],
    ),
    ("cloud", "Cloud", &["AWS", "Azure", "GCP"]),
    (
        "databases",
        "Databases",
        &["MongoDB", "PostgreSQL", "MySQL", "Redis"],
    ),
    (
        "testing",
        "Testing & QA",
        &["Unit Testing", "Selenium", "Test Automation", "Performance Testing"],
    ),
    (
        "embedded",
        "Embedded",
        &["Embedded C", "RTOS", "Microcontrollers", "Embedded Linux"],
    ),
];

const EXPECTATIONS: &[(&str, u8)] = &[
    ("Python", 4),
    ("Java", 3),
    ("C", 3),
    ("C++", 3),
    ("JavaScript", 3),
    ("TypeScript", 3),
    ("SQL", 2),
    ("Excel", 3),
    ("Power BI", 2),
    ("Pandas", 3),
    ("Statistics", 2),
    ("Machine Learning", 3),
    ("Deep Learning", 2),
    ("TensorFlow", 2),
    ("PyTorch", 2),
    ("Computer Vision", 2),
    ("HTML", 3),
    ("CSS", 3),
    ("React", 3),
    ("Node.js", 3),
    ("REST APIs", 3),
    ("Git", 4),
    ("Docker", 3),
    ("Kubernetes", 2),
    ("CI/CD", 3),
    ("Sensor Fusion", 2),
    ("AUTOSAR", 2),
    ("ISO 26262", 2),
    ("CAN Bus", 3),
    ("MATLAB/Simulink", 3),
    ("AWS", 2),
    ("MongoDB", 3),
    ("PostgreSQL", 3),
    ("Unit Testing", 4),
    ("Embedded C", 3),
];

/// Config for the default taxonomy
#[must_use]
pub fn builtin_config() -> TaxonomyConfig {
    TaxonomyConfig {
        sections: SECTIONS
            .iter()
            .map(|(key, title, skills)| Section::new(*key, *title, skills.iter().copied()))
            .collect(),
        expectations: EXPECTATIONS
            .iter()
            .map(|(skill, level)| ((*skill).to_string(), *level))
            .collect(),
    }
}

impl Taxonomy {
    /// The default taxonomy
    #[must_use]
    pub fn builtin() -> Self {
        Self::lenient(builtin_config()).0
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OTHER_SECTION;

    #[test]
    fn builtin_has_no_data_issues() {
        assert!(Taxonomy::new(builtin_config()).is_ok());
    }

    #[test]
    fn builtin_sections_cover_the_core_groups() {
        let taxonomy = Taxonomy::builtin();
        for key in ["programming", "data-analytics", "ai-dl", "frontend", "backend", "devops", "adas", "embedded"] {
            assert!(taxonomy.section(key).is_some(), "missing section {key}");
        }
        assert_eq!(taxonomy.section_of("Python"), "programming");
        assert_eq!(taxonomy.section_of("Rust"), OTHER_SECTION);
    }

    #[test]
    fn every_expectation_names_a_listed_skill() {
        let taxonomy = Taxonomy::builtin();
        for (skill, _) in EXPECTATIONS {
            assert!(taxonomy.contains(skill), "{skill} has an expectation but no section");
        }
    }
}
