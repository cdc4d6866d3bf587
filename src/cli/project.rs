use serde_json::json;

use crate::api::project_api::{self, Projects};
use crate::cli::commands::ProjectCommands;
use crate::cli::{create_record, delete_record, edit_record, report, Context};
use crate::error::ObraError;
use crate::models::ProjectDraft;
use crate::output;
use crate::screen::CrudScreen;

pub fn run(ctx: &Context, cmd: ProjectCommands) -> i32 {
    let result = match cmd {
        ProjectCommands::List => run_list(ctx),
        ProjectCommands::Show { id } => run_show(ctx, id),
        ProjectCommands::Create { name, description } => run_create(ctx, name, description),
        ProjectCommands::Update {
            id,
            name,
            description,
        } => run_update(ctx, id, name, description),
        ProjectCommands::Delete { id, yes } => run_delete(ctx, id, yes),
        ProjectCommands::Use { id } => run_use(ctx, id),
    };
    report(result, ctx.json)
}

fn run_list(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let projects = CrudScreen::open(Projects(&client))?.into_records();
    let active = ctx.settings.active_project_id;
    ctx.emit(
        json!({ "projects": output::json::value(&projects), "active_project_id": active }),
        || output::text::print_project_list(&projects, active),
    );
    Ok(0)
}

fn run_show(ctx: &Context, id: i64) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project = project_api::get_project(&client, id)?;
    ctx.emit(output::json::value(&project), || {
        output::text::print_project(&project)
    });
    Ok(0)
}

fn run_create(ctx: &Context, name: String, description: Option<String>) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let company_id = client.session().claims().and_then(|c| c.cid);
    let draft = ProjectDraft {
        name,
        description,
        company_id,
    };
    let project = create_record(Projects(&client), &draft)?;
    ctx.emit(json!({ "project": output::json::value(&project) }), || {
        println!("Created project: {} ({})", project.name, project.id)
    });
    Ok(0)
}

fn run_update(
    ctx: &Context,
    id: i64,
    name: Option<String>,
    description: Option<String>,
) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project = edit_record(Projects(&client), id, |current| {
        let mut draft = ProjectDraft::from(current);
        if let Some(name) = name {
            draft.name = name;
        }
        if description.is_some() {
            draft.description = description;
        }
        Ok(draft)
    })?;
    ctx.emit(json!({ "project": output::json::value(&project) }), || {
        println!("Updated project: {} ({})", project.name, project.id)
    });
    Ok(0)
}

fn run_delete(ctx: &Context, id: i64, yes: bool) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    delete_record(Projects(&client), id, yes, |p| p.name.clone())?;

    if ctx.settings.active_project_id == Some(id) {
        let mut settings = ctx.settings.clone();
        settings.active_project_id = None;
        settings.save()?;
    }
    ctx.emit(json!({ "deleted": id }), || println!("Deleted project {id}"));
    Ok(0)
}

fn run_use(ctx: &Context, id: i64) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project = project_api::get_project(&client, id)?;
    let mut settings = ctx.settings.clone();
    settings.active_project_id = Some(project.id);
    settings.save()?;
    ctx.emit(
        json!({ "active_project_id": project.id, "name": project.name }),
        || println!("Active project: {} ({})", project.name, project.id),
    );
    Ok(0)
}
