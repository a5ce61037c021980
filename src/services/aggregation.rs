//! Department grouping of schedule maps.
//!
//! Pure functions: the board calls [`aggregate`] after every fetch and every
//! filter change. Department order inside a date is first-seen order, not
//! alphabetical, so the grouping on screen follows the store's row order.

use crate::domain::models::{
    DateGroup, DepartmentFilter, DepartmentGroup, GroupedView, ScheduleMap, Task,
};

/// Filter each date's tasks by department, then group them by department.
///
/// Dates left with no tasks after filtering are omitted.
pub fn aggregate(schedule: &ScheduleMap, filter: &DepartmentFilter) -> GroupedView {
    let dates = schedule
        .iter()
        .filter_map(|(date, tasks)| {
            let departments = group_by_department(tasks.iter().filter(|t| filter.matches(t)));
            if departments.is_empty() {
                None
            } else {
                Some(DateGroup {
                    date: *date,
                    departments,
                })
            }
        })
        .collect();

    GroupedView { dates }
}

/// Total number of tasks across every date and department.
pub fn count(view: &GroupedView) -> usize {
    view.dates.iter().map(DateGroup::task_count).sum()
}

/// Distinct departments across the whole view, in first-seen order.
pub fn departments_in(view: &GroupedView) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for group in view.dates.iter().flat_map(|d| &d.departments) {
        if !seen.iter().any(|s| *s == group.department) {
            seen.push(group.department.clone());
        }
    }
    seen
}

fn group_by_department<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<DepartmentGroup> {
    let mut groups: Vec<DepartmentGroup> = Vec::new();
    for task in tasks {
        // Linear scan: a date carries a handful of departments at most.
        match groups.iter_mut().find(|g| g.department == task.department) {
            Some(group) => group.tasks.push(task.clone()),
            None => groups.push(DepartmentGroup {
                department: task.department.clone(),
                tasks: vec![task.clone()],
            }),
        }
    }
    groups
}
