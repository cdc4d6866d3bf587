use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::info;

use crate::api::task_api::{self, Tasks};
use crate::cli::commands::TaskCommands;
use crate::cli::{delete_record, report, Context};
use crate::error::ObraError;
use crate::models::{Priority, Task, TaskDraft, Validate};
use crate::output;
use crate::screen::CrudScreen;
use crate::tree::status::needs_sync;
use crate::tree::{apply_change, business_days, derive_status, gantt, FieldChange, TaskArena};

pub fn run(ctx: &Context, cmd: TaskCommands) -> i32 {
    let result = match cmd {
        TaskCommands::List { flat } => run_list(ctx, flat),
        TaskCommands::Show { id } => run_show(ctx, id),
        TaskCommands::Add {
            name,
            start,
            end,
            description,
            parent,
            priority,
            responsible,
            depends_on,
        } => {
            let mut draft = TaskDraft::new(name);
            draft.start_date = Some(start);
            draft.end_date = Some(end);
            draft.description = description;
            draft.parent_id = parent;
            draft.priority = priority;
            draft.responsible_user_id = responsible;
            draft.dependencies = depends_on;
            run_add(ctx, draft)
        }
        TaskCommands::Update {
            id,
            name,
            description,
            start,
            end,
            parent,
            root,
            priority,
            responsible,
            depends_on,
        } => {
            let edits = TaskEdits {
                name,
                description,
                start,
                end,
                parent: if root { Some(None) } else { parent.map(Some) },
                priority,
                responsible,
                depends_on,
            };
            run_update(ctx, id, edits)
        }
        TaskCommands::Progress { id, value } => {
            run_change(ctx, id, &[FieldChange::Progress(value)])
        }
        TaskCommands::Start { id, date } => {
            let day = date.unwrap_or(ctx.today);
            run_change(ctx, id, &[FieldChange::ActualStart(Some(day))])
        }
        TaskCommands::Finish { id, date } => {
            let day = date.unwrap_or(ctx.today);
            run_change(
                ctx,
                id,
                &[FieldChange::ActualEnd(Some(day)), FieldChange::Progress(100)],
            )
        }
        TaskCommands::Status { id, status } => {
            run_change(ctx, id, &[FieldChange::Status(status)])
        }
        TaskCommands::Delete { id, yes } => run_delete(ctx, id, yes),
        TaskCommands::SyncStatus => run_sync_status(ctx),
    };
    report(result, ctx.json)
}

pub fn run_gantt(ctx: &Context) -> i32 {
    report(gantt_chart(ctx), ctx.json)
}

fn task_json(task: &Task, today: NaiveDate, depth: Option<usize>) -> Value {
    let mut v = output::json::value(task);
    v["status"] = json!(derive_status(task, today).as_str());
    v["stored_status"] = json!(task.status.as_str());
    v["duration"] = json!(business_days(task.start_date, task.end_date));
    if let Some(depth) = depth {
        v["depth"] = json!(depth);
    }
    v
}

fn run_list(ctx: &Context, flat: bool) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let arena = task_api::load_tasks(&client, ctx.project_id()?)?;
    let rows = arena.flatten_with_depth();
    let today = ctx.today;

    let tasks: Vec<Value> = rows
        .iter()
        .map(|(depth, t)| task_json(t, today, Some(*depth)))
        .collect();
    ctx.emit(json!({ "tasks": tasks }), || {
        output::text::print_task_rows(&rows, today, !flat)
    });
    Ok(0)
}

fn run_show(ctx: &Context, id: i64) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let arena = task_api::load_tasks(&client, ctx.project_id()?)?;
    let task = arena.require(id)?;
    let mut v = task_json(task, ctx.today, None);
    v["subtasks"] = json!(arena.children_of(id));
    ctx.emit(json!({ "task": v }), || output::text::print_task(task, ctx.today));
    Ok(0)
}

fn run_add(ctx: &Context, draft: TaskDraft) -> Result<i32, ObraError> {
    draft.validate()?;
    let client = ctx.client()?;
    let project_id = ctx.project_id()?;

    let mut screen = CrudScreen::open(Tasks {
        client: &client,
        project_id,
    })?;
    if let Some(parent) = draft.parent_id {
        if screen.find(parent).is_none() {
            return Err(ObraError::not_found("Parent task", parent));
        }
    }
    screen.begin_new();
    let task = screen.submit(&draft)?;
    ctx.emit(json!({ "task": task_json(&task, ctx.today, None) }), || {
        println!("Added task: {} ({})", task.name, task.id)
    });
    Ok(0)
}

/// Field overrides for `task update`. `parent: Some(None)` moves to the top.
struct TaskEdits {
    name: Option<String>,
    description: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    parent: Option<Option<i64>>,
    priority: Option<Priority>,
    responsible: Option<i64>,
    depends_on: Option<String>,
}

fn run_update(ctx: &Context, id: i64, edits: TaskEdits) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let mut screen = CrudScreen::open(Tasks {
        client: &client,
        project_id: ctx.project_id()?,
    })?;
    screen.select(id)?;

    if let Some(new_parent) = edits.parent {
        let arena = TaskArena::from_records(screen.records().to_vec());
        arena.check_reparent(id, new_parent)?;
    }

    let mut draft = TaskDraft::from(screen.begin_edit()?);
    if let Some(name) = edits.name {
        draft.name = name;
    }
    if edits.description.is_some() {
        draft.description = edits.description;
    }
    if edits.start.is_some() {
        draft.start_date = edits.start;
    }
    if edits.end.is_some() {
        draft.end_date = edits.end;
    }
    if let Some(parent) = edits.parent {
        draft.parent_id = parent;
    }
    if let Some(priority) = edits.priority {
        draft.priority = priority;
    }
    if edits.responsible.is_some() {
        draft.responsible_user_id = edits.responsible;
    }
    if edits.depends_on.is_some() {
        draft.dependencies = edits.depends_on;
    }

    let task = screen.submit(&draft)?;
    ctx.emit(json!({ "task": task_json(&task, ctx.today, None) }), || {
        println!("Updated task: {} ({})", task.name, task.id)
    });
    Ok(0)
}

/// Apply field changes with their status rules and save the full record.
fn run_change(ctx: &Context, id: i64, changes: &[FieldChange]) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let mut screen = CrudScreen::open(Tasks {
        client: &client,
        project_id: ctx.project_id()?,
    })?;
    screen.select(id)?;
    let mut task = screen.begin_edit()?.clone();
    let before = task.status;
    for change in changes {
        apply_change(&mut task, *change);
    }
    let saved = screen.submit(&TaskDraft::from(&task))?;
    ctx.emit(json!({ "task": task_json(&saved, ctx.today, None) }), || {
        if before == saved.status {
            println!(
                "Updated task: {} ({}) {}% [{}]",
                saved.name,
                saved.id,
                saved.progress,
                saved.status.as_str()
            );
        } else {
            println!(
                "Updated task: {} ({}) {}% [{} → {}]",
                saved.name,
                saved.id,
                saved.progress,
                before.as_str(),
                saved.status.as_str()
            );
        }
    });
    Ok(0)
}

fn run_delete(ctx: &Context, id: i64, yes: bool) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project_id = ctx.project_id()?;
    delete_record(Tasks { client: &client, project_id }, id, yes, |t| t.name.clone())?;
    ctx.emit(json!({ "deleted": id }), || println!("Deleted task {id}"));
    Ok(0)
}

/// Push every stored status that differs from the derived one. Last
/// write wins.
fn run_sync_status(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let arena = task_api::load_tasks(&client, ctx.project_id()?)?;
    let stale: Vec<&Task> = arena
        .flatten()
        .into_iter()
        .filter(|t| needs_sync(t, ctx.today))
        .collect();

    let mut updated = Vec::with_capacity(stale.len());
    let mut changes = Vec::with_capacity(stale.len());
    for task in stale {
        let mut draft = TaskDraft::from(task);
        draft.status = derive_status(task, ctx.today);
        task_api::update_task(&client, task.id, &draft)?;
        info!(task = task.id, status = draft.status.as_str(), "status synced");
        updated.push(task.id);
        changes.push((task.id, draft.status));
    }

    let changes_json: Vec<Value> = changes
        .iter()
        .map(|(id, status)| json!({ "id": id, "status": status.as_str() }))
        .collect();
    ctx.emit(
        json!({ "updated": updated, "changes": changes_json }),
        || {
            if changes.is_empty() {
                println!("All task statuses are up to date.");
                return;
            }
            println!("Synced {} task status(es):", changes.len());
            for (id, status) in &changes {
                println!("  {id} -> {}", status.as_str());
            }
        },
    );
    Ok(0)
}

fn gantt_chart(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let arena = task_api::load_tasks(&client, ctx.project_id()?)?;
    let chart = gantt::project(&arena, ctx.today);
    ctx.emit(output::json::value(&chart), || {
        output::text::print_gantt(&chart, ctx.today)
    });
    Ok(0)
}
