use clap::Parser;
use std::process;

use obra::cli::commands::{Cli, Commands};
use obra::cli::{self, account, admin, budget, document, project, task, Context};
use obra::logging;

fn main() {
    let cli_args = Cli::parse();
    logging::init(cli_args.verbose);
    let json_output = cli_args.json;

    let ctx = match Context::new(&cli_args) {
        Ok(ctx) => ctx,
        Err(e) => process::exit(cli::report(Err(e), json_output)),
    };

    let exit_code = match cli_args.command {
        Commands::Login { email, password } => {
            account::run_login(&ctx, &email, password.as_deref())
        }
        Commands::Logout => account::run_logout(&ctx),
        Commands::Whoami => account::run_whoami(&ctx),
        Commands::Config(cmd) => account::run_config(&ctx, cmd),
        Commands::Project(cmd) => project::run(&ctx, cmd),
        Commands::Task(cmd) => task::run(&ctx, cmd),
        Commands::Gantt => task::run_gantt(&ctx),
        Commands::Contractor(cmd) => budget::run_contractor(&ctx, cmd),
        Commands::WorkItem(cmd) => budget::run_work_item(&ctx, cmd),
        Commands::Contract(cmd) => budget::run_contract(&ctx, cmd),
        Commands::Estimate(cmd) => budget::run_estimate(&ctx, cmd),
        Commands::Budget => budget::run_summary(&ctx),
        Commands::Folder(cmd) => document::run_folder(&ctx, cmd),
        Commands::Document(cmd) => document::run_document(&ctx, cmd),
        Commands::Admin(cmd) => admin::run(&ctx, cmd),
    };

    process::exit(exit_code);
}
