use std::path::Path;

use serde_json::json;

use crate::api::document_api::{self, Folders};
use crate::cli::commands::{DocumentCommands, FolderCommands};
use crate::cli::{create_record, delete_record, edit_record, report, save_bytes, Context};
use crate::error::ObraError;
use crate::models::{DocumentDraft, FolderDraft};
use crate::output;
use crate::screen::CrudScreen;
use crate::tree::folders::build_folder_tree;

pub fn run_folder(ctx: &Context, cmd: FolderCommands) -> i32 {
    let result = match cmd {
        FolderCommands::Tree => run_tree(ctx),
        FolderCommands::Show { id } => run_show(ctx, id),
        FolderCommands::Create { name, parent } => run_create(ctx, name, parent),
        FolderCommands::Rename { id, name } => run_rename(ctx, id, name),
        FolderCommands::Delete { id, yes } => run_delete(ctx, id, yes),
    };
    report(result, ctx.json)
}

pub fn run_document(ctx: &Context, cmd: DocumentCommands) -> i32 {
    let result = match cmd {
        DocumentCommands::Create { folder, name, file } => run_create_document(ctx, folder, name, &file),
        DocumentCommands::Upload { id, file } => run_upload(ctx, id, &file),
        DocumentCommands::Download { version_id, output } => run_download(ctx, version_id, &output),
        DocumentCommands::Model {
            folder,
            document,
            output,
        } => run_model(ctx, folder, document, &output),
    };
    report(result, ctx.json)
}

fn run_tree(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let folders = CrudScreen::open(Folders {
        client: &client,
        project_id: ctx.project_id()?,
    })?
    .into_records();
    let tree = build_folder_tree(&folders);
    ctx.emit(json!({ "folders": output::json::value(&tree) }), || {
        output::text::print_folder_tree(&tree)
    });
    Ok(0)
}

fn run_show(ctx: &Context, id: i64) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let folder = document_api::get_folder(&client, id)?;
    ctx.emit(output::json::value(&folder), || {
        output::text::print_folder_contents(&folder)
    });
    Ok(0)
}

fn run_create(ctx: &Context, name: String, parent: Option<i64>) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let draft = FolderDraft {
        name,
        parent_id: parent,
    };
    let folder = create_record(
        Folders {
            client: &client,
            project_id: ctx.project_id()?,
        },
        &draft,
    )?;
    ctx.emit(json!({ "folder": output::json::value(&folder) }), || {
        println!("Created folder: {} ({})", folder.name, folder.id)
    });
    Ok(0)
}

fn run_rename(ctx: &Context, id: i64, name: String) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let resource = Folders {
        client: &client,
        project_id: ctx.project_id()?,
    };
    let folder = edit_record(resource, id, |current| {
        Ok(FolderDraft {
            name,
            parent_id: current.parent_id,
        })
    })?;
    ctx.emit(json!({ "folder": output::json::value(&folder) }), || {
        println!("Renamed folder {} to {}", folder.id, folder.name)
    });
    Ok(0)
}

fn run_delete(ctx: &Context, id: i64, yes: bool) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let resource = Folders {
        client: &client,
        project_id: ctx.project_id()?,
    };
    delete_record(resource, id, yes, |f| f.name.clone())?;
    ctx.emit(json!({ "deleted": id }), || println!("Deleted folder {id}"));
    Ok(0)
}

fn file_stem(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn run_create_document(ctx: &Context, folder: i64, name: Option<String>, file: &Path) -> Result<i32, ObraError> {
    let draft = DocumentDraft {
        name: name.unwrap_or_else(|| file_stem(file)),
        folder_id: folder,
    };
    let client = ctx.client()?;
    let document = document_api::create_document(&client, &draft, file)?;
    ctx.emit(json!({ "document": output::json::value(&document) }), || {
        println!(
            "Created document: {} ({}) with {}",
            document.name,
            document.id,
            file.display()
        )
    });
    Ok(0)
}

fn run_upload(ctx: &Context, id: i64, file: &Path) -> Result<i32, ObraError> {
    if !file.is_file() {
        return Err(ObraError::validation(format!(
            "File not found: {}",
            file.display()
        )));
    }
    let client = ctx.client()?;
    let upload = document_api::upload_version(&client, id, file)?;
    let message = upload
        .message
        .unwrap_or_else(|| format!("Uploaded new version of document {id}"));
    ctx.emit(json!({ "document_id": id, "message": message }), || {
        println!("{message}")
    });
    Ok(0)
}

fn run_download(ctx: &Context, version_id: i64, output_path: &Path) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let bytes = document_api::download_version(&client, version_id)?;
    save_bytes(output_path, &bytes)?;
    ctx.emit(
        json!({ "version_id": version_id, "path": output_path.display().to_string(), "bytes": bytes.len() }),
        || println!("Saved {} bytes to {}", bytes.len(), output_path.display()),
    );
    Ok(0)
}

fn run_model(ctx: &Context, folder: i64, document: i64, output_path: &Path) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let (doc, version) = document_api::model_version(&client, folder, document)?;
    let bytes = document_api::download_version(&client, version.id)?;
    save_bytes(output_path, &bytes)?;
    ctx.emit(
        json!({
            "document_id": doc.id,
            "version": output::json::value(&version),
            "path": output_path.display().to_string(),
            "bytes": bytes.len(),
        }),
        || {
            println!(
                "Saved model {} v{} ({} bytes) to {}",
                version.filename,
                version.version_number,
                bytes.len(),
                output_path.display()
            )
        },
    );
    Ok(0)
}
