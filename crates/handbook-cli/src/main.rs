//! Handbook CLI

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use handbook_cli::commands::{cmd_build, cmd_check, cmd_nav, cmd_show, Context};
use handbook_cli::config_handlers::handle_config_command;
use handbook_cli::{Cli, Command, HandbookConfig};
use handbook_site::{NavigationOutcome, NoticeLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let content = cli.content.as_deref();
    let context = || -> Result<Context> {
        let config = HandbookConfig::load(config_path).context("loading configuration")?;
        let ctx = Context::new(config, content)?;
        tracing::debug!(content = %ctx.content_root.display(), "resolved content root");
        Ok(ctx)
    };

    match cli.command {
        Command::Config(action) => {
            handle_config_command(config_path, action)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Build { out } => {
            let ctx = context()?;
            let report = cmd_build(&ctx, out.as_deref()).await?;
            println!(
                "Built {} pages and {} drawer notes into {}",
                report.pages,
                report.notes,
                report.out_dir.display()
            );
            if report.missing_drawers > 0 {
                eprintln!("{} drawer link(s) point at missing notes", report.missing_drawers);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Nav { json, filter } => {
            let ctx = context()?;
            print!("{}", cmd_nav(&ctx, json, filter.as_deref()).await?);
            Ok(ExitCode::SUCCESS)
        }

        Command::Show { route, drawer } => {
            let ctx = context()?;
            let report = cmd_show(&ctx, &route, drawer.as_deref()).await?;
            for notice in &report.notices {
                eprintln!("{notice}");
            }
            if let Some(page) = &report.page {
                println!("{}", page.rendered.html);
            }
            if let Some(drawer) = &report.drawer {
                println!("<aside data-note=\"{}\">\n{}</aside>", drawer.note_id, drawer.html);
            }
            let failed = report.outcome != NavigationOutcome::Displayed
                || report.notices.iter().any(|n| n.level == NoticeLevel::Error);
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Command::Check => {
            let ctx = context()?;
            let report = cmd_check(&ctx).await?;
            for problem in &report.problems {
                println!("{problem}");
            }
            println!(
                "Checked {} pages and {} drawer notes: {} problem(s)",
                report.pages_checked,
                report.notes_checked,
                report.problems.len()
            );
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
