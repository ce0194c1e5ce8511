//! Department grouping of the filtered request list.

use std::collections::{BTreeMap, HashSet};

use crate::{LeaveRequest, NO_DEPARTMENT_LABEL};

/// A labelled group of rows
#[derive(Debug, Clone, PartialEq)]
pub struct ListSection<'a> {
    /// Upper-cased department name
    pub label: String,
    pub rows: Vec<&'a LeaveRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListLayout<'a> {
    Empty,
    /// Fewer than two departments: rows in input order, no headers
    Flat(Vec<&'a LeaveRequest>),
    Grouped(Vec<ListSection<'a>>),
}

/// Distinct non-blank department names
pub fn count_unique_departments(requests: &[LeaveRequest]) -> usize {
    requests
        .iter()
        .filter_map(LeaveRequest::department_name)
        .collect::<HashSet<_>>()
        .len()
}

pub fn layout_requests(requests: &[LeaveRequest]) -> ListLayout<'_> {
    if requests.is_empty() {
        return ListLayout::Empty;
    }
    if count_unique_departments(requests) < 2 {
        return ListLayout::Flat(requests.iter().collect());
    }

    let mut groups: BTreeMap<String, Vec<&LeaveRequest>> = BTreeMap::new();
    for request in requests {
        let name = request.department_name().unwrap_or(NO_DEPARTMENT_LABEL);
        groups.entry(name.to_string()).or_default().push(request);
    }

    let mut sections: Vec<ListSection<'_>> = groups
        .into_iter()
        .map(|(name, rows)| ListSection {
            label: name.to_uppercase(),
            rows,
        })
        .collect();
    sections.sort_by(|a, b| a.label.cmp(&b.label));

    ListLayout::Grouped(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Department, LeaveStatus, Task};

    fn request(id: i64, department: Option<&str>) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_name: format!("Dipendente {}", id),
            fiscal_code: None,
            profile_pic: None,
            department: Department {
                id: None,
                name: department.map(str::to_string),
                color: None,
            },
            task: Task::default(),
            type_id: 1,
            type_name: "MALATTIA".to_string(),
            status: LeaveStatus::Pending,
            data_inizio: None,
            data_fine: None,
            note: None,
            moorea_obj: None,
            certificate: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(layout_requests(&[]), ListLayout::Empty);
    }

    #[test]
    fn test_single_department_renders_flat() {
        let requests = vec![request(3, Some("Sala")), request(1, None), request(2, Some("Sala"))];
        match layout_requests(&requests) {
            ListLayout::Flat(rows) => {
                let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
                assert_eq!(ids, vec![3, 1, 2]);
            }
            other => panic!("expected flat layout, got {:?}", other),
        }
    }

    #[test]
    fn test_grouped_sections_are_sorted() {
        let requests = vec![
            request(1, Some("sala")),
            request(2, Some("Cucina")),
            request(3, None),
            request(4, Some("sala")),
        ];
        match layout_requests(&requests) {
            ListLayout::Grouped(sections) => {
                let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
                assert_eq!(labels, vec!["CUCINA", "NESSUN REPARTO", "SALA"]);

                let sala: Vec<i64> = sections[2].rows.iter().map(|r| r.id).collect();
                assert_eq!(sala, vec![1, 4]);
                assert_eq!(sections[1].rows[0].id, 3);

                let total: usize = sections.iter().map(|s| s.rows.len()).sum();
                assert_eq!(total, requests.len());
            }
            other => panic!("expected grouped layout, got {:?}", other),
        }
    }

    #[test]
    fn test_count_ignores_blank_departments() {
        let requests = vec![request(1, Some("  ")), request(2, None), request(3, Some("Bar"))];
        assert_eq!(count_unique_departments(&requests), 1);
    }
}
