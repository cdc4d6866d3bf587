use chrono::{Datelike, NaiveDate};

use crate::api::Claims;
use crate::budget::{
    format_mxn, format_percent, ContractTotals, EstimatePreview, EstimateTotals, WorkItemTotals,
};
use crate::models::{
    Company, Contract, Contractor, Estimate, FolderContents, NonWorkingDay, Project, Task, User,
    WorkItem,
};
use crate::tree::duration::is_weekend;
use crate::tree::folders::{walk, FolderNode};
use crate::tree::gantt::GanttChart;
use crate::tree::{business_days, derive_status};

/// Left/right aligned columns, widths fitted to content.
struct Table {
    headers: Vec<&'static str>,
    right: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &[(&'static str, bool)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| *h).collect(),
            right: columns.iter().map(|(_, r)| *r).collect(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        let line = |cells: Vec<&str>| -> String {
            let parts: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let w = widths.get(i).copied().unwrap_or(0);
                    if self.right.get(i).copied().unwrap_or(false) {
                        format!("{cell:>w$}")
                    } else {
                        format!("{cell:<w$}")
                    }
                })
                .collect();
            format!("  {}", parts.join("  ").trim_end())
        };

        let mut out = vec![line(self.headers.clone())];
        out.push(format!(
            "  {}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
        ));
        for row in &self.rows {
            out.push(line(row.iter().map(String::as_str).collect()));
        }
        out.join("\n")
    }

    fn print(&self) {
        println!("{}", self.render());
    }
}

fn date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

fn opt(s: Option<&str>) -> &str {
    s.filter(|s| !s.is_empty()).unwrap_or("-")
}

// ─── Session ───────────────────────────────────────────

pub fn print_claims(claims: &Claims, api_url: &str) {
    println!("Signed in as {}", claims.display_email());
    println!("  Role: {}", opt(claims.role.as_deref()));
    if let Some(cid) = claims.cid {
        println!("  Company: {cid}");
    }
    println!("  Backend: {api_url}");
}

// ─── Projects ──────────────────────────────────────────

pub fn print_project_list(projects: &[Project], active: Option<i64>) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }
    let mut table = Table::new(&[("", false), ("ID", true), ("NAME", false), ("DESCRIPTION", false)]);
    for p in projects {
        table.row(vec![
            if Some(p.id) == active { "*".into() } else { String::new() },
            p.id.to_string(),
            p.name.clone(),
            opt(p.description.as_deref()).to_string(),
        ]);
    }
    table.print();
}

pub fn print_project(p: &Project) {
    println!("Project: {} ({})", p.name, p.id);
    if let Some(ref desc) = p.description {
        println!("  Description: {desc}");
    }
    let tasks = crate::tree::flatten_tree(&p.tasks);
    println!("  Tasks: {}", tasks.len());
    println!("  Folders: {}", p.folders.len());
}

// ─── Tasks ─────────────────────────────────────────────

/// Indented task tree (or flat list) with statuses derived for `today`.
pub fn print_task_rows(rows: &[(usize, &Task)], today: NaiveDate, indent: bool) {
    if rows.is_empty() {
        println!("No tasks found.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("TASK", false),
        ("STATUS", false),
        ("PROGRESS", true),
        ("START", false),
        ("END", false),
        ("DAYS", true),
        ("PRIORITY", false),
    ]);
    for (depth, t) in rows {
        let name = if indent {
            format!("{}{}", "  ".repeat(*depth), t.name)
        } else {
            t.name.clone()
        };
        table.row(vec![
            t.id.to_string(),
            name,
            derive_status(t, today).as_str().to_string(),
            format!("{}%", t.progress),
            date(t.start_date),
            date(t.end_date),
            business_days(t.start_date, t.end_date).to_string(),
            t.priority.as_str().to_string(),
        ]);
    }
    table.print();
}

pub fn print_task(t: &Task, today: NaiveDate) {
    println!("Task: {} ({})", t.name, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    let derived = derive_status(t, today);
    if derived == t.status {
        println!("  Status: {}", t.status.as_str());
    } else {
        println!("  Status: {} (stored: {})", derived.as_str(), t.status.as_str());
    }
    println!("  Progress: {}%", t.progress);
    println!("  Priority: {}", t.priority.as_str());
    println!(
        "  Planned: {} .. {} ({} business days)",
        date(t.start_date),
        date(t.end_date),
        business_days(t.start_date, t.end_date)
    );
    if t.actual_start_date.is_some() || t.actual_end_date.is_some() {
        println!(
            "  Actual: {} .. {}",
            date(t.actual_start_date),
            date(t.actual_end_date)
        );
    }
    if let Some(parent) = t.parent_id {
        println!("  Parent: {parent}");
    }
    match (&t.responsible_user, t.responsible_user_id) {
        (Some(user), _) => println!("  Responsible: {}", user.email),
        (None, Some(id)) => println!("  Responsible: user {id}"),
        _ => {}
    }
    if let Some(deps) = t.dependencies.as_deref().filter(|d| !d.trim().is_empty()) {
        println!("  Depends on: {deps}");
    }
}

// ─── Gantt ─────────────────────────────────────────────

const GANTT_LABEL_WIDTH: usize = 28;
const GANTT_MAX_DAYS: usize = 120;

pub fn print_gantt(chart: &GanttChart, today: NaiveDate) {
    println!("{}", render_gantt(chart, today));
    for warning in &chart.warnings {
        eprintln!("warning: {warning}");
    }
}

/// One row per task and one column per day. `█` scheduled workday,
/// `░` scheduled weekend, `·` weekend, `|` today. At most
/// `GANTT_MAX_DAYS` columns are drawn from the earliest start.
pub fn render_gantt(chart: &GanttChart, today: NaiveDate) -> String {
    let dated: Vec<(NaiveDate, NaiveDate)> = chart
        .data
        .iter()
        .filter_map(|t| Some((t.start_date?, t.end_date?)))
        .collect();
    let (Some(first), Some(last)) = (
        dated.iter().map(|(s, _)| *s).min(),
        dated.iter().map(|(s, e)| (*e).max(*s)).max(),
    ) else {
        return "No scheduled tasks.".to_string();
    };
    let days: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .take(GANTT_MAX_DAYS)
        .collect();
    let shown_last = days.last().copied().unwrap_or(first);

    let mut out = Vec::new();
    if shown_last < last {
        out.push(format!(
            "{:w$} {first} .. {shown_last} (chart ends {last}, showing first {GANTT_MAX_DAYS} days)",
            "",
            w = GANTT_LABEL_WIDTH
        ));
    } else {
        out.push(format!("{:w$} {first} .. {last}", "", w = GANTT_LABEL_WIDTH));
    }
    let weekdays: String = days
        .iter()
        .map(|d| d.format("%a").to_string().chars().next().unwrap_or(' '))
        .collect();
    out.push(format!("{:w$} {weekdays}", "", w = GANTT_LABEL_WIDTH));

    for task in &chart.data {
        let mut label = format!("{}{}", "  ".repeat(task.depth), task.text);
        if label.chars().count() > GANTT_LABEL_WIDTH {
            label = label.chars().take(GANTT_LABEL_WIDTH - 1).collect::<String>() + "…";
        }
        let bar: String = days
            .iter()
            .map(|d| {
                let scheduled = matches!(
                    (task.start_date, task.end_date),
                    (Some(s), Some(e)) if s <= *d && *d <= e
                );
                match (scheduled, is_weekend(d.weekday())) {
                    (true, false) => '█',
                    (true, true) => '░',
                    (false, _) if *d == today => '|',
                    (false, true) => '·',
                    (false, false) => ' ',
                }
            })
            .collect();
        out.push(format!(
            "{label:<w$} {bar} {}d {:.0}% {}",
            task.duration,
            task.progress * 100.0,
            task.status.as_str(),
            w = GANTT_LABEL_WIDTH
        ));
    }
    out.join("\n")
}

// ─── Budget ────────────────────────────────────────────

pub fn print_contractors(contractors: &[Contractor]) {
    if contractors.is_empty() {
        println!("No contractors found.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("LEGAL NAME", false),
        ("CONTACT", false),
        ("PHONE", false),
        ("EMAIL", false),
    ]);
    for c in contractors {
        table.row(vec![
            c.id.to_string(),
            c.legal_name.clone(),
            opt(c.contact.as_deref()).to_string(),
            opt(c.phone.as_deref()).to_string(),
            opt(c.email.as_deref()).to_string(),
        ]);
    }
    table.print();
}

pub fn print_work_items(items: &[WorkItem], weights: &[f64], totals: &WorkItemTotals) {
    if items.is_empty() {
        println!("No work items found.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("CODE", false),
        ("DESCRIPTION", false),
        ("BASE BUDGET", true),
        ("WEIGHT", true),
        ("ACTUAL COST", true),
        ("VARIANCE", true),
    ]);
    for (w, weight) in items.iter().zip(weights) {
        table.row(vec![
            w.id.to_string(),
            w.code.clone(),
            w.description.clone(),
            format_mxn(w.base_budget),
            format_percent(*weight),
            format_mxn(w.actual_cost),
            format_mxn(w.cost_variance),
        ]);
    }
    let weight_total: f64 = weights.iter().sum();
    table.row(vec![
        String::new(),
        "TOTAL".into(),
        String::new(),
        format_mxn(totals.base_budget),
        format_percent(weight_total),
        format_mxn(totals.actual_cost),
        format_mxn(totals.cost_variance),
    ]);
    table.print();
}

pub fn print_contracts(contracts: &[Contract], totals: &ContractTotals) {
    if contracts.is_empty() {
        println!("No contracts found.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("NUMBER", false),
        ("CONTRACTOR", false),
        ("WORK ITEM", false),
        ("CONTRACTED", true),
        ("ADDITIVE", true),
        ("DEDUCTIVE", true),
        ("TOTAL", true),
        ("VAT", true),
        ("TOTAL+VAT", true),
        ("ADVANCE", true),
    ]);
    for c in contracts {
        let contractor = c
            .contractor
            .as_ref()
            .map(|r| r.legal_name.clone())
            .or_else(|| c.contractor_id.map(|id| format!("#{id}")))
            .unwrap_or_else(|| "-".into());
        let work_item = c
            .work_item
            .as_ref()
            .map(|r| r.code.clone())
            .or_else(|| c.work_item_id.map(|id| format!("#{id}")))
            .unwrap_or_else(|| "-".into());
        table.row(vec![
            c.id.to_string(),
            c.number.clone(),
            contractor,
            work_item,
            format_mxn(c.contracted),
            format_mxn(c.additive),
            format_mxn(c.deductive),
            format_mxn(c.total),
            format_mxn(c.vat),
            format_mxn(c.total_with_vat),
            format_mxn(c.advance),
        ]);
    }
    table.row(vec![
        String::new(),
        "TOTAL".into(),
        String::new(),
        String::new(),
        format_mxn(totals.contracted),
        format_mxn(totals.additive),
        format_mxn(totals.deductive),
        format_mxn(totals.total),
        format_mxn(totals.vat),
        format_mxn(totals.total_with_vat),
        format_mxn(totals.advance),
    ]);
    table.print();
}

pub fn print_estimates(estimates: &[Estimate], totals: &EstimateTotals) {
    if estimates.is_empty() {
        println!("No estimates found.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("NUMBER", false),
        ("CONTRACT", false),
        ("ESTIMATED", true),
        ("DEDUCTIONS", true),
        ("AMORTIZED", true),
        ("GUARANTEE", true),
        ("RETENTIONS", true),
        ("TOTAL", true),
        ("VAT", true),
        ("TOTAL+VAT", true),
    ]);
    for e in estimates {
        let contract = e
            .contract
            .as_ref()
            .map(|c| c.number.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| e.contract_key().map(|id| format!("#{id}")))
            .unwrap_or_else(|| "-".into());
        table.row(vec![
            e.id.to_string(),
            opt(e.number.as_deref()).to_string(),
            contract,
            format_mxn(e.estimated),
            format_mxn(e.deductions),
            format_mxn(e.amortized),
            format_mxn(e.guarantee_fund),
            format_mxn(e.retentions),
            format_mxn(e.total),
            format_mxn(e.vat),
            format_mxn(e.total_with_vat),
        ]);
    }
    table.row(vec![
        String::new(),
        "TOTAL".into(),
        String::new(),
        format_mxn(totals.estimated),
        format_mxn(totals.deductions),
        format_mxn(totals.amortized),
        format_mxn(totals.guarantee_fund),
        format_mxn(totals.retentions),
        format_mxn(totals.total),
        format_mxn(totals.vat),
        format_mxn(totals.total_with_vat),
    ]);
    table.print();
}

pub fn print_estimate_preview(preview: &EstimatePreview, applies_vat: bool) {
    println!("Subtotal:  {}", format_mxn(preview.subtotal));
    if applies_vat {
        println!("VAT (16%): {}", format_mxn(preview.vat));
    } else {
        println!("VAT:       {} (contract without VAT)", format_mxn(preview.vat));
    }
    println!("Total:     {}", format_mxn(preview.total_with_vat));
}

pub fn print_budget_summary(
    project: &Project,
    work_items: &WorkItemTotals,
    contracts: &ContractTotals,
    estimates: &EstimateTotals,
) {
    println!("Budget: {} ({})", project.name, project.id);
    println!("  Work items");
    println!("    Base budget:   {}", format_mxn(work_items.base_budget));
    println!("    Actual cost:   {}", format_mxn(work_items.actual_cost));
    println!("    Variance:      {}", format_mxn(work_items.cost_variance));
    println!("  Contracts");
    println!("    Contracted:    {}", format_mxn(contracts.contracted));
    println!("    Total + VAT:   {}", format_mxn(contracts.total_with_vat));
    println!("    Advances:      {}", format_mxn(contracts.advance));
    println!("  Estimates");
    println!("    Estimated:     {}", format_mxn(estimates.estimated));
    println!("    Total + VAT:   {}", format_mxn(estimates.total_with_vat));
    let pending = contracts.total_with_vat - estimates.total_with_vat;
    println!("  Pending to estimate: {}", format_mxn(pending));
}

// ─── Documents ─────────────────────────────────────────

pub fn print_folder_tree(nodes: &[FolderNode]) {
    if nodes.is_empty() {
        println!("No folders found.");
        return;
    }
    for (depth, node) in walk(nodes) {
        println!("{}{}/ ({})", "  ".repeat(depth + 1), node.name, node.id);
    }
}

pub fn print_folder_contents(folder: &FolderContents) {
    println!("Folder: {} ({})", folder.name, folder.id);
    for sub in &folder.subfolders {
        println!("  {}/ ({})", sub.name, sub.id);
    }
    if folder.documents.is_empty() {
        println!("  No documents.");
        return;
    }
    let mut table = Table::new(&[
        ("ID", true),
        ("DOCUMENT", false),
        ("VERSION", true),
        ("VERSION ID", true),
        ("FILE", false),
        ("UPLOADED", false),
    ]);
    for doc in &folder.documents {
        match doc.latest_version() {
            Some(v) => table.row(vec![
                doc.id.to_string(),
                doc.name.clone(),
                format!("v{}", v.version_number),
                v.id.to_string(),
                v.filename.clone(),
                opt(v.uploaded_at.as_deref()).to_string(),
            ]),
            None => table.row(vec![
                doc.id.to_string(),
                doc.name.clone(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
            ]),
        }
    }
    table.print();
}

// ─── Admin ─────────────────────────────────────────────

pub fn print_companies(companies: &[Company]) {
    if companies.is_empty() {
        println!("No companies found.");
        return;
    }
    let mut table = Table::new(&[("ID", true), ("NAME", false)]);
    for c in companies {
        table.row(vec![c.id.to_string(), c.name.clone()]);
    }
    table.print();
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    let mut table = Table::new(&[("ID", true), ("EMAIL", false), ("ROLE", false), ("COMPANY", true)]);
    for u in users {
        table.row(vec![
            u.id.to_string(),
            u.email.clone(),
            u.role.as_str().to_string(),
            u.company_id.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        ]);
    }
    table.print();
}

pub fn print_non_working_days(days: &[NonWorkingDay]) {
    if days.is_empty() {
        println!("No non-working days configured.");
        return;
    }
    let mut table = Table::new(&[("ID", true), ("DATE", false), ("DESCRIPTION", false)]);
    for d in days {
        table.row(vec![
            d.id.to_string(),
            d.date.to_string(),
            opt(d.description.as_deref()).to_string(),
        ]);
    }
    table.print();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::tree::gantt::GanttTask;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_table_aligns_columns() {
        let mut table = Table::new(&[("ID", true), ("NAME", false)]);
        table.row(vec!["7".into(), "Cimentación".into()]);
        table.row(vec!["12".into(), "Losa".into()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "  ID  NAME");
        assert_eq!(lines[2], "   7  Cimentación");
        assert_eq!(lines[3], "  12  Losa");
    }

    #[test]
    fn test_gantt_shades_weekends() {
        let chart = GanttChart {
            data: vec![GanttTask {
                id: 1,
                text: "Muros".into(),
                start_date: Some(d(2024, 1, 5)),
                end_date: Some(d(2024, 1, 8)),
                duration: 2,
                progress: 0.5,
                parent: 0,
                status: TaskStatus::InProgress,
                kind: "task",
                open: true,
                depth: 0,
            }],
            links: vec![],
            warnings: vec![],
        };
        let text = render_gantt(&chart, d(2024, 1, 6));
        let row = text.lines().last().unwrap();
        assert!(row.contains("█░░█"));
        assert!(row.ends_with("2d 50% in_progress"));
    }

    #[test]
    fn test_gantt_window_is_capped() {
        let chart = GanttChart {
            data: vec![GanttTask {
                id: 1,
                text: "Impermeabilización".into(),
                start_date: Some(d(2024, 1, 1)),
                end_date: Some(d(2100, 12, 31)),
                duration: 19826,
                progress: 0.0,
                parent: 0,
                status: TaskStatus::Pending,
                kind: "task",
                open: true,
                depth: 0,
            }],
            links: vec![],
            warnings: vec![],
        };
        let text = render_gantt(&chart, d(2024, 1, 2));
        assert!(text.lines().next().unwrap().contains("chart ends 2100-12-31"));
        let row = text.lines().last().unwrap();
        assert_eq!(row.chars().filter(|c| matches!(c, '█' | '░')).count(), GANTT_MAX_DAYS);
        assert!(row.chars().count() < GANTT_LABEL_WIDTH + GANTT_MAX_DAYS + 40);
    }

    #[test]
    fn test_gantt_without_dates() {
        let chart = GanttChart::default();
        assert_eq!(render_gantt(&chart, d(2024, 1, 1)), "No scheduled tasks.");
    }
}
