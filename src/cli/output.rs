use serde::Serialize;
use crate::models::{Funnel, FunnelColumn, Lead, Task, TaskColumn, User};

/// Render rows as a left-aligned table with a header and a rule line
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(render(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        lines.push(render(row.clone()));
    }
    lines.join("\n")
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

/// Serialize to pretty JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users.".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| vec![u.id.to_string(), u.name.clone()])
        .collect();
    format_table(&["ID", "Name"], &rows)
}

pub fn format_columns(columns: &[TaskColumn]) -> String {
    let rows: Vec<Vec<String>> = columns
        .iter()
        .map(|c| vec![c.order.to_string(), c.id.to_string(), c.name.clone()])
        .collect();
    format_table(&["#", "ID", "Column"], &rows)
}

pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks.".to_string();
    }
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.order.to_string(),
                t.id.to_string(),
                t.priority.as_str().to_string(),
                t.title.clone(),
            ]
        })
        .collect();
    format_table(&["#", "ID", "Priority", "Title"], &rows)
}

pub fn format_funnels(funnels: &[Funnel]) -> String {
    if funnels.is_empty() {
        return "No funnels.".to_string();
    }
    let rows: Vec<Vec<String>> = funnels
        .iter()
        .map(|f| vec![f.id.to_string(), f.name.clone(), or_dash(f.description.as_deref())])
        .collect();
    format_table(&["ID", "Funnel", "Description"], &rows)
}

pub fn format_stages(stages: &[FunnelColumn]) -> String {
    let rows: Vec<Vec<String>> = stages
        .iter()
        .map(|s| vec![s.order.to_string(), s.id.to_string(), s.name.clone(), s.color.clone()])
        .collect();
    format_table(&["#", "ID", "Stage", "Color"], &rows)
}

pub fn format_leads(leads: &[Lead]) -> String {
    if leads.is_empty() {
        return "No leads.".to_string();
    }
    let rows: Vec<Vec<String>> = leads
        .iter()
        .map(|l| {
            vec![
                l.order.to_string(),
                l.id.to_string(),
                l.name.clone(),
                or_dash(l.company.as_deref()),
                or_dash(l.email.as_deref()),
                l.value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v)),
            ]
        })
        .collect();
    format_table(&["#", "ID", "Lead", "Company", "Email", "Value"], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_format_table_alignment() {
        let table = format_table(
            &["ID", "Name"],
            &[vec!["1".into(), "Ada".into()], vec!["10".into(), "Grace".into()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--  -----");
        assert_eq!(lines[2], "1   Ada");
        assert_eq!(lines[3], "10  Grace");
    }

    #[test]
    fn test_format_tasks() {
        let task = Task {
            id: 4,
            uuid: "u".into(),
            column_id: 1,
            title: "Launch email".into(),
            description: None,
            priority: Priority::High,
            order: 0,
            created_ts: 0,
            modified_ts: 0,
        };
        let out = format_tasks(&[task]);
        assert!(out.contains("Launch email"));
        assert!(out.contains("high"));
        assert_eq!(format_tasks(&[]), "No tasks.");
    }

    #[test]
    fn test_format_leads_placeholders() {
        let lead = Lead {
            id: 1,
            uuid: "u".into(),
            column_id: 1,
            name: "Acme".into(),
            email: None,
            phone: None,
            company: Some(String::new()),
            value: Some(1500.0),
            notes: None,
            order: 0,
            created_ts: 0,
            modified_ts: 0,
        };
        let out = format_leads(&[lead]);
        let row = out.lines().nth(2).unwrap();
        assert!(row.contains("Acme"));
        assert!(row.contains("1500.00"));
        assert!(row.contains('-'));
    }
}
