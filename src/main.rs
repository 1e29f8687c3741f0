use anyhow::{Context as _, Result};
use clap::Parser;
use std::io;

use pepbump::cli::orchestration::{
    self, ChangeResult, Context, InitOutcome, PublishOptions, PublishOutcome,
};
use pepbump::cli::{Cli, Command, UpdateArgs};
use pepbump::config;
use pepbump::git::Git2Repository;
use pepbump::substitution::FileOutcome;
use pepbump::ui::{Reporter, TerminalPrompt, Verbosity};

fn main() {
    let cli = Cli::parse();
    let reporter = Reporter::new(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = run(cli, reporter) {
        reporter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli, reporter: Reporter) -> Result<()> {
    let config = config::load_config(cli.config.as_deref()).context("Error loading config")?;

    let (dry_run, overwrite) = match &cli.command {
        Command::Init { overwrite } => (false, *overwrite),
        Command::Bump { update, .. } | Command::SetVersion { update, .. } => {
            (update.dry_run, update.overwrite)
        }
        Command::CurrentVersion => (false, false),
    };

    // Command-line paths win over the configuration file
    let store_path = cli.store.unwrap_or(config.files.store);
    let history_path = cli
        .history
        .or(config.files.history)
        .unwrap_or_else(|| config::default_history_path(&store_path));
    let ctx = Context {
        reporter,
        dry_run,
        overwrite,
        store_path,
        history_path,
        version_token: config.substitution.version_token,
        git: config.git,
    };
    let mut prompt = TerminalPrompt;

    match cli.command {
        Command::Init { .. } => {
            reporter.headline("Initialising pepbump");
            let result = orchestration::run_init(&ctx, &mut prompt)?;
            if result.store == InitOutcome::Skipped {
                reporter.status(&format!("{} left as it was", ctx.store_path.display()));
            }
        }
        Command::CurrentVersion => {
            let version = orchestration::current_version(&ctx)?;
            println!("{}", version);
        }
        Command::Bump { levels, update } => {
            let result = orchestration::run_bump(
                &ctx,
                &levels.to_levels(),
                &publish_options(&update),
                &mut prompt,
                &mut io::stdout(),
                || Git2Repository::open(ctx.store_dir()),
            )?;
            report_change(&reporter, &result);
        }
        Command::SetVersion { version, update } => {
            let result = orchestration::run_set_version(
                &ctx,
                &version,
                &publish_options(&update),
                &mut prompt,
                &mut io::stdout(),
                || Git2Repository::open(ctx.store_dir()),
            )?;
            report_change(&reporter, &result);
        }
    }

    Ok(())
}

fn publish_options(update: &UpdateArgs) -> PublishOptions {
    PublishOptions {
        git_push: update.git_push,
        git_tag: update.git_tag,
        message: update.message.clone(),
    }
}

fn report_change(reporter: &Reporter, result: &ChangeResult) {
    for file in &result.summary.files {
        let verb = match file.outcome {
            FileOutcome::Written => "Updated",
            FileOutcome::Skipped => "Skipped",
            FileOutcome::Previewed => "Previewed",
        };
        reporter.status(&format!("{} {}", verb, file.destination.display()));
    }

    match &result.publish {
        PublishOutcome::Published { tag: Some(tag), .. } => {
            reporter.success(&format!("Published {} with tag {}", result.current, tag))
        }
        PublishOutcome::Published { tag: None, .. } => {
            reporter.success(&format!("Published {}", result.current))
        }
        PublishOutcome::Failed => reporter.status("Local files were updated but not published"),
        PublishOutcome::NotRequested => {}
    }
}
