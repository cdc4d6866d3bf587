use chrono::NaiveDate;
use serde_json::json;

use crate::api::admin_api;
use crate::cli::commands::{AdminCommands, CompanyCommands, HolidayCommands, UserCommands};
use crate::cli::{confirm, report, Context};
use crate::error::ObraError;
use crate::models::{CompanyDraft, NewUser, NonWorkingDayDraft, Role};
use crate::output;

pub fn run(ctx: &Context, cmd: AdminCommands) -> i32 {
    let result = match cmd {
        AdminCommands::Company(CompanyCommands::List) => run_company_list(ctx),
        AdminCommands::Company(CompanyCommands::Create { name }) => run_company_create(ctx, name),
        AdminCommands::User(UserCommands::List) => run_user_list(ctx),
        AdminCommands::User(UserCommands::Create {
            email,
            password,
            company,
            role,
        }) => run_user_create(
            ctx,
            NewUser {
                email,
                password,
                company_id: company,
                role,
            },
        ),
        AdminCommands::Holidays(HolidayCommands::List) => run_holiday_list(ctx),
        AdminCommands::Holidays(HolidayCommands::Add { date, description }) => {
            run_holiday_add(ctx, date, description)
        }
        AdminCommands::Holidays(HolidayCommands::Delete { id, yes }) => {
            run_holiday_delete(ctx, id, yes)
        }
    };
    report(result, ctx.json)
}

fn run_company_list(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let companies = admin_api::list_companies(&client)?;
    ctx.emit(json!({ "companies": output::json::value(&companies) }), || {
        output::text::print_companies(&companies)
    });
    Ok(0)
}

fn run_company_create(ctx: &Context, name: String) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let company = admin_api::create_company(&client, &CompanyDraft { name })?;
    ctx.emit(json!({ "company": output::json::value(&company) }), || {
        println!("Created company: {} ({})", company.name, company.id)
    });
    Ok(0)
}

fn run_user_list(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let users = admin_api::list_users(&client)?;
    ctx.emit(json!({ "users": output::json::value(&users) }), || {
        output::text::print_users(&users)
    });
    Ok(0)
}

fn run_user_create(ctx: &Context, mut user: NewUser) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    // Company admins create users in their own company by default.
    if user.company_id.is_none() && user.role != Role::SuperAdmin {
        user.company_id = client.session().claims().and_then(|c| c.cid);
    }
    let created = admin_api::create_user(&client, &user)?;
    ctx.emit(json!({ "user": output::json::value(&created) }), || {
        println!(
            "Created user: {} ({}) [{}]",
            created.email,
            created.id,
            created.role.as_str()
        )
    });
    Ok(0)
}

fn run_holiday_list(ctx: &Context) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let days = admin_api::list_non_working_days(&client)?;
    ctx.emit(json!({ "non_working_days": output::json::value(&days) }), || {
        output::text::print_non_working_days(&days)
    });
    Ok(0)
}

fn run_holiday_add(ctx: &Context, date: NaiveDate, description: Option<String>) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    let day = admin_api::add_non_working_day(&client, &NonWorkingDayDraft { date, description })?;
    ctx.emit(json!({ "non_working_day": output::json::value(&day) }), || {
        println!("Added non-working day {} ({})", day.date, day.id)
    });
    Ok(0)
}

fn run_holiday_delete(ctx: &Context, id: i64, yes: bool) -> Result<i32, ObraError> {
    let client = ctx.client()?;
    if !confirm(yes, &format!("Delete non-working day {id}?")) {
        return Err(ObraError::cancelled());
    }
    admin_api::delete_non_working_day(&client, id)?;
    ctx.emit(json!({ "deleted": id }), || println!("Deleted non-working day {id}"));
    Ok(0)
}
