use std::path::Path;

use serde_json::json;

use crate::api::budget_api::{
    self, ContractQuery, Contractors, Contracts, Estimates, WorkItems,
};
use crate::api::project_api;
use crate::api::ApiClient;
use crate::budget::{
    preview_estimate, unique_contractors, weight_percentages, ContractTotals, EstimateFilter,
    EstimateTotals, WorkItemTotals,
};
use crate::cli::commands::{
    ContractCommands, ContractorCommands, EstimateAmounts, EstimateCommands, WorkItemCommands,
};
use crate::cli::{create_record, delete_record, edit_record, report, save_bytes, Context};
use crate::error::ObraError;
use crate::models::{ContractDraft, ContractorDraft, EstimateDraft, UploadReport, WorkItemDraft};
use crate::output;
use crate::screen::CrudScreen;

fn print_upload(ctx: &Context, report: &UploadReport, file: &Path) {
    let message = report
        .message
        .clone()
        .unwrap_or_else(|| format!("Imported {}", file.display()));
    ctx.emit(json!({ "message": message }), || println!("{message}"));
}

fn export(ctx: &Context, bytes: Vec<u8>, output: &Path) -> Result<i32, ObraError> {
    save_bytes(output, &bytes)?;
    ctx.emit(
        json!({ "path": output.display().to_string(), "bytes": bytes.len() }),
        || println!("Saved {} bytes to {}", bytes.len(), output.display()),
    );
    Ok(0)
}

// ─── Contractors ───────────────────────────────────────

pub fn run_contractor(ctx: &Context, cmd: ContractorCommands) -> i32 {
    report(contractor(ctx, cmd), ctx.json)
}

fn contractor(ctx: &Context, cmd: ContractorCommands) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    match cmd {
        ContractorCommands::List => {
            let list = CrudScreen::open(Contractors(&client))?.into_records();
            ctx.emit(json!({ "contractors": output::json::value(&list) }), || {
                output::text::print_contractors(&list)
            });
        }
        ContractorCommands::Create {
            legal_name,
            contact,
            phone,
            email,
        } => {
            let draft = ContractorDraft {
                legal_name,
                contact,
                phone,
                email,
            };
            let saved = create_record(Contractors(&client), &draft)?;
            ctx.emit(json!({ "contractor": output::json::value(&saved) }), || {
                println!("Created contractor: {} ({})", saved.legal_name, saved.id)
            });
        }
        ContractorCommands::Update {
            id,
            legal_name,
            contact,
            phone,
            email,
        } => {
            let saved = edit_record(Contractors(&client), id, |current| {
                let mut draft = ContractorDraft::from(current);
                if let Some(v) = legal_name {
                    draft.legal_name = v;
                }
                if contact.is_some() {
                    draft.contact = contact;
                }
                if phone.is_some() {
                    draft.phone = phone;
                }
                if email.is_some() {
                    draft.email = email;
                }
                Ok(draft)
            })?;
            ctx.emit(json!({ "contractor": output::json::value(&saved) }), || {
                println!("Updated contractor: {} ({})", saved.legal_name, saved.id)
            });
        }
        ContractorCommands::Delete { id, yes } => {
            delete_record(Contractors(&client), id, yes, |c| c.legal_name.clone())?;
            ctx.emit(json!({ "deleted": id }), || println!("Deleted contractor {id}"));
        }
        ContractorCommands::Import { file } => {
            let report = budget_api::import_contractors(&client, &file)?;
            print_upload(ctx, &report, &file);
        }
    }
    Ok(0)
}

// ─── Work items ────────────────────────────────────────

pub fn run_work_item(ctx: &Context, cmd: WorkItemCommands) -> i32 {
    report(work_item(ctx, cmd), ctx.json)
}

fn work_item(ctx: &Context, cmd: WorkItemCommands) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let resource = WorkItems {
        client: &client,
        project_id: ctx.project_id()?,
    };
    match cmd {
        WorkItemCommands::List => {
            let items = CrudScreen::open(resource)?.into_records();
            let weights = weight_percentages(&items);
            let totals = WorkItemTotals::sum(&items);
            let rows: Vec<_> = items
                .iter()
                .zip(&weights)
                .map(|(item, weight)| {
                    let mut v = output::json::value(item);
                    v["weight"] = json!(weight);
                    v
                })
                .collect();
            ctx.emit(
                json!({ "work_items": rows, "totals": output::json::value(&totals) }),
                || output::text::print_work_items(&items, &weights, &totals),
            );
        }
        WorkItemCommands::Create {
            code,
            description,
            base_budget,
        } => {
            let draft = WorkItemDraft {
                code,
                description,
                base_budget,
            };
            let saved = create_record(resource, &draft)?;
            ctx.emit(json!({ "work_item": output::json::value(&saved) }), || {
                println!("Created work item: {} ({})", saved.code, saved.id)
            });
        }
        WorkItemCommands::Update {
            id,
            code,
            description,
            base_budget,
        } => {
            let saved = edit_record(resource, id, |current| {
                let mut draft = WorkItemDraft::from(current);
                if let Some(v) = code {
                    draft.code = v;
                }
                if let Some(v) = description {
                    draft.description = v;
                }
                if let Some(v) = base_budget {
                    draft.base_budget = v;
                }
                Ok(draft)
            })?;
            ctx.emit(json!({ "work_item": output::json::value(&saved) }), || {
                println!("Updated work item: {} ({})", saved.code, saved.id)
            });
        }
        WorkItemCommands::Delete { id, yes } => {
            delete_record(resource, id, yes, |w| w.code.clone())?;
            ctx.emit(json!({ "deleted": id }), || println!("Deleted work item {id}"));
        }
    }
    Ok(0)
}

// ─── Contracts ─────────────────────────────────────────

pub fn run_contract(ctx: &Context, cmd: ContractCommands) -> i32 {
    report(contract(ctx, cmd), ctx.json)
}

fn contract(ctx: &Context, cmd: ContractCommands) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project_id = ctx.project_id()?;
    let api = &client;
    let resource = move |query| Contracts {
        client: api,
        project_id,
        query,
    };
    match cmd {
        ContractCommands::List {
            contractor,
            contract,
        } => {
            let query = ContractQuery {
                contractor_id: contractor,
                contract_id: contract,
            };
            let list = CrudScreen::open(resource(query))?.into_records();
            let totals = ContractTotals::sum(&list);
            let contractors: Vec<_> = unique_contractors(&list)
                .into_iter()
                .map(|(id, name)| json!({ "id": id, "legal_name": name }))
                .collect();
            ctx.emit(
                json!({
                    "contracts": output::json::value(&list),
                    "totals": output::json::value(&totals),
                    "contractors": contractors,
                }),
                || output::text::print_contracts(&list, &totals),
            );
        }
        ContractCommands::Create {
            contractor,
            work_item,
            number,
            works,
            contracted,
            additive,
            deductive,
            advance,
            no_vat,
        } => {
            let draft = ContractDraft {
                contractor_id: Some(contractor),
                work_item_id: Some(work_item),
                number,
                works,
                contracted,
                additive,
                deductive,
                advance,
                applies_vat: !no_vat,
            };
            let saved = create_record(resource(ContractQuery::default()), &draft)?;
            ctx.emit(json!({ "contract": output::json::value(&saved) }), || {
                println!("Created contract: {} ({})", saved.number, saved.id)
            });
        }
        ContractCommands::Update {
            id,
            contractor,
            work_item,
            number,
            works,
            contracted,
            additive,
            deductive,
            advance,
            applies_vat,
        } => {
            let saved = edit_record(resource(ContractQuery::default()), id, |current| {
                let mut draft = ContractDraft::from(current);
                if contractor.is_some() {
                    draft.contractor_id = contractor;
                }
                if work_item.is_some() {
                    draft.work_item_id = work_item;
                }
                if let Some(v) = number {
                    draft.number = v;
                }
                if let Some(v) = works {
                    draft.works = v;
                }
                if let Some(v) = contracted {
                    draft.contracted = v;
                }
                if let Some(v) = additive {
                    draft.additive = v;
                }
                if let Some(v) = deductive {
                    draft.deductive = v;
                }
                if let Some(v) = advance {
                    draft.advance = v;
                }
                if let Some(v) = applies_vat {
                    draft.applies_vat = v;
                }
                Ok(draft)
            })?;
            ctx.emit(json!({ "contract": output::json::value(&saved) }), || {
                println!("Updated contract: {} ({})", saved.number, saved.id)
            });
        }
        ContractCommands::Delete { id, yes } => {
            delete_record(resource(ContractQuery::default()), id, yes, |c| c.number.clone())?;
            ctx.emit(json!({ "deleted": id }), || println!("Deleted contract {id}"));
        }
        ContractCommands::Import { file } => {
            let report = budget_api::import_contracts(&client, project_id, &file)?;
            print_upload(ctx, &report, &file);
        }
        ContractCommands::Export { output } => {
            let bytes = budget_api::export_contracts(&client, project_id)?;
            return export(ctx, bytes, &output);
        }
    }
    Ok(0)
}

// ─── Estimates ─────────────────────────────────────────

fn estimate_draft(contract: i64, number: String, amounts: EstimateAmounts) -> EstimateDraft {
    EstimateDraft {
        contract_id: Some(contract),
        number,
        estimated: amounts.estimated,
        deductions: amounts.deductions,
        amortized: amounts.amortized,
        guarantee_fund: amounts.guarantee_fund,
        retentions: amounts.retentions,
    }
}

fn contract_applies_vat(client: &ApiClient, project_id: i64, contract_id: i64) -> Result<bool, ObraError> {
    let query = ContractQuery {
        contractor_id: None,
        contract_id: Some(contract_id),
    };
    budget_api::list_contracts(client, project_id, query)?
        .into_iter()
        .find(|c| c.id == contract_id)
        .map(|c| c.applies_vat)
        .ok_or_else(|| ObraError::not_found("Contract", contract_id))
}

pub fn run_estimate(ctx: &Context, cmd: EstimateCommands) -> i32 {
    report(estimate(ctx, cmd), ctx.json)
}

fn estimate(ctx: &Context, cmd: EstimateCommands) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project_id = ctx.project_id()?;
    let api = &client;
    let resource = move |filter| Estimates {
        client: api,
        project_id,
        filter,
    };
    match cmd {
        EstimateCommands::List {
            contractor,
            contract,
        } => {
            let filter = EstimateFilter {
                contractor_id: contractor,
                contract_id: contract,
            };
            let list = CrudScreen::open(resource(filter))?.into_records();
            let totals = EstimateTotals::sum(&list);
            ctx.emit(
                json!({
                    "estimates": output::json::value(&list),
                    "totals": output::json::value(&totals),
                }),
                || output::text::print_estimates(&list, &totals),
            );
        }
        EstimateCommands::Create {
            contract,
            number,
            amounts,
        } => {
            let draft = estimate_draft(contract, number, amounts);
            let saved = create_record(resource(EstimateFilter::default()), &draft)?;
            ctx.emit(json!({ "estimate": output::json::value(&saved) }), || {
                println!("Created estimate {} for contract {contract}", saved.id)
            });
        }
        EstimateCommands::Update {
            id,
            contract,
            number,
            estimated,
            deductions,
            amortized,
            guarantee_fund,
            retentions,
        } => {
            let saved = edit_record(resource(EstimateFilter::default()), id, |current| {
                let mut draft = EstimateDraft::from(current);
                if contract.is_some() {
                    draft.contract_id = contract;
                }
                if let Some(v) = number {
                    draft.number = v;
                }
                if let Some(v) = estimated {
                    draft.estimated = v;
                }
                if let Some(v) = deductions {
                    draft.deductions = v;
                }
                if let Some(v) = amortized {
                    draft.amortized = v;
                }
                if let Some(v) = guarantee_fund {
                    draft.guarantee_fund = v;
                }
                if let Some(v) = retentions {
                    draft.retentions = v;
                }
                Ok(draft)
            })?;
            ctx.emit(json!({ "estimate": output::json::value(&saved) }), || {
                println!("Updated estimate {}", saved.id)
            });
        }
        EstimateCommands::Delete { id, yes } => {
            delete_record(resource(EstimateFilter::default()), id, yes, |e| {
                e.number.clone().unwrap_or_else(|| format!("#{}", e.id))
            })?;
            ctx.emit(json!({ "deleted": id }), || println!("Deleted estimate {id}"));
        }
        EstimateCommands::Import { file } => {
            let report = budget_api::import_estimates(&client, project_id, &file)?;
            print_upload(ctx, &report, &file);
        }
        EstimateCommands::Export { output } => {
            let bytes = budget_api::export_estimates(&client, project_id)?;
            return export(ctx, bytes, &output);
        }
        EstimateCommands::Preview { contract, amounts } => {
            let applies_vat = contract_applies_vat(&client, project_id, contract)?;
            let preview = preview_estimate(
                amounts.estimated,
                amounts.deductions,
                amounts.amortized,
                amounts.guarantee_fund,
                amounts.retentions,
                applies_vat,
            );
            ctx.emit(
                json!({
                    "contract_id": contract,
                    "applies_vat": applies_vat,
                    "preview": output::json::value(&preview),
                }),
                || output::text::print_estimate_preview(&preview, applies_vat),
            );
        }
    }
    Ok(0)
}

// ─── Summary ───────────────────────────────────────────

pub fn run_summary(ctx: &Context) -> i32 {
    report(summary(ctx), ctx.json)
}

fn summary(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let project_id = ctx.project_id()?;
    let project = project_api::get_project(&client, project_id)?;
    let items = budget_api::list_work_items(&client, project_id)?;
    let contracts = budget_api::list_contracts(&client, project_id, ContractQuery::default())?;
    let estimates = budget_api::list_estimates(&client, project_id)?;

    let work_totals = WorkItemTotals::sum(&items);
    let contract_totals = ContractTotals::sum(&contracts);
    let estimate_totals = EstimateTotals::sum(&estimates);
    ctx.emit(
        json!({
            "project_id": project.id,
            "work_items": output::json::value(&work_totals),
            "contracts": output::json::value(&contract_totals),
            "estimates": output::json::value(&estimate_totals),
            "pending_to_estimate": contract_totals.total_with_vat - estimate_totals.total_with_vat,
        }),
        || {
            output::text::print_budget_summary(
                &project,
                &work_totals,
                &contract_totals,
                &estimate_totals,
            )
        },
    );
    Ok(0)
}
