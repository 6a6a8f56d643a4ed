use serde::{Deserialize, Serialize};

use super::domain::{Course, CourseCategory, CoursePermissions};

/// Allow-list entry that admits every department or level.
pub const WILDCARD: &str = "all";

/// Attributes of the person browsing the course catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub department: String,
    pub level: String,
}

impl CoursePermissions {
    /// Unrestricted permissions for newly created courses.
    pub fn open() -> Self {
        Self {
            departments: vec![WILDCARD.to_string()],
            levels: vec![WILDCARD.to_string()],
        }
    }

    pub fn admits(&self, viewer: &Viewer) -> bool {
        allows(&self.departments, &viewer.department) && allows(&self.levels, &viewer.level)
    }

    /// Add `value` to the chosen allow-list, or remove it when already present.
    pub fn toggle(&mut self, axis: PermissionAxis, value: &str) {
        let list = match axis {
            PermissionAxis::Departments => &mut self.departments,
            PermissionAxis::Levels => &mut self.levels,
        };

        if let Some(position) = list.iter().position(|entry| entry == value) {
            list.remove(position);
        } else {
            list.push(value.to_string());
        }
    }
}

fn allows(list: &[String], value: &str) -> bool {
    list.iter().any(|entry| entry == WILDCARD || entry == value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAxis {
    Departments,
    Levels,
}

/// Catalogue filters on top of the permission check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseQuery {
    /// `None` shows every category.
    #[serde(default)]
    pub category: Option<CourseCategory>,
    /// Case-insensitive substring of the title.
    #[serde(default)]
    pub search: Option<String>,
}

impl CourseQuery {
    fn matches(&self, course: &Course) -> bool {
        let category_ok = self
            .category
            .map(|category| course.category == category)
            .unwrap_or(true);
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => course.title.to_lowercase().contains(&term.to_lowercase()),
        };
        category_ok && search_ok
    }
}

pub fn visible_courses<'a>(
    courses: &'a [Course],
    viewer: &Viewer,
    query: &CourseQuery,
) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|course| course.permissions.admits(viewer) && query.matches(course))
        .collect()
}
