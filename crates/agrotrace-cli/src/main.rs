// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logs;
mod runtime;

use agrotrace_app::DEFAULT_FEED_CAPACITY;
use agrotrace_feed::Client;
use agrotrace_testkit::reference_now;
use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::{Dashboard, ListQuery, View};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("AGROTRACE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `agrotrace --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let client = if config.feed_enabled() && !options.demo {
        Some(
            Client::new(config.feed_base_url(), config.feed_timeout()?).with_context(|| {
                format!(
                    "invalid [feed] config in {}; fix base_url/timeout values",
                    options.config_path.display()
                )
            })?,
        )
    } else {
        None
    };

    if options.check_only {
        if let Some(client) = &client {
            let total = client.ping()?;
            println!("feed ok: {} reports {total} animals", client.base_url());
        } else {
            println!("feed disabled; demo herd of {} animals", config.herd_size());
        }
        return Ok(());
    }

    let mut dashboard = Dashboard::load(
        client.as_ref(),
        config.page_size(),
        config.herd_size(),
        config.demo_seed(),
    );

    match options.view {
        View::Roster => {
            dashboard.apply(&options.query)?;
            if options.json {
                println!("{}", dashboard.render_json()?);
                return Ok(());
            }
            if options.stats {
                print!("{}", dashboard.render_stats());
            }
            print!("{}", dashboard.render_table());
        }
        View::Readings => {
            let mut view = dashboard.reading_log();
            view.apply(&options.query);
            if options.json {
                println!("{}", logs::render_readings_json(&view)?);
                return Ok(());
            }
            if options.stats {
                print!("{}", logs::render_reading_stats(view.log()));
            }
            print!("{}", logs::render_readings(&view));
        }
        View::Health => {
            let today = reference_now().date();
            let mut view = dashboard.health_log();
            view.apply(&options.query);
            if options.json {
                println!("{}", logs::render_health_json(&view, today)?);
                return Ok(());
            }
            if options.stats {
                print!("{}", logs::render_health_stats(view.log(), today));
            }
            print!("{}", logs::render_health(&view));
        }
        View::Activity => {
            let (feed, source, now) = dashboard.activity(client.as_ref(), options.limit);
            if options.json {
                println!("{}", logs::render_activity_json(&feed, source, now)?);
            } else {
                print!("{}", logs::render_activity(&feed, source, now));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    stats: bool,
    json: bool,
    show_help: bool,
    view: View,
    limit: usize,
    query: ListQuery,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        stats: false,
        json: false,
        show_help: false,
        view: View::Roster,
        limit: DEFAULT_FEED_CAPACITY,
        query: ListQuery {
            page: 1,
            ..ListQuery::default()
        },
    };
    let mut view_flag: Option<&'static str> = None;
    let mut status: Option<String> = None;
    let mut group_flag: Option<&'static str> = None;
    let mut paged = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            flag @ ("--readings" | "--health" | "--activity") => {
                let (flag, view) = match flag {
                    "--readings" => ("--readings", View::Readings),
                    "--health" => ("--health", View::Health),
                    _ => ("--activity", View::Activity),
                };
                if let Some(previous) = view_flag
                    && previous != flag
                {
                    bail!("{previous} and {flag} cannot be combined; pick one view per run");
                }
                view_flag = Some(flag);
                options.view = view;
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires a query"))?;
                options.query.search = Some(value.as_ref().to_owned());
            }
            "--status" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--status requires a status name"))?;
                status = Some(value.as_ref().to_owned());
            }
            flag @ ("--breed" | "--location" | "--vet") => {
                let (flag, what) = match flag {
                    "--breed" => ("--breed", "a breed name"),
                    "--location" => ("--location", "a reader location"),
                    _ => ("--vet", "a veterinarian name"),
                };
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{flag} requires {what}"))?;
                options.query.group = Some(value.as_ref().to_owned());
                group_flag = Some(flag);
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a page number"))?;
                let page: usize = value
                    .as_ref()
                    .parse()
                    .with_context(|| format!("invalid page {:?}", value.as_ref()))?;
                options.query.page = page.max(1);
                paged = true;
            }
            "--limit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--limit requires a number of entries"))?;
                let limit: usize = value
                    .as_ref()
                    .parse()
                    .with_context(|| format!("invalid limit {:?}", value.as_ref()))?;
                options.limit = limit.max(1);
            }
            "--stats" => {
                options.stats = true;
            }
            "--json" => {
                options.json = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    let view = options.view;
    if let Some(flag) = group_flag
        && view.group_flag() != Some(flag)
    {
        bail!("{flag} does not apply to the {} view", view.as_str());
    }
    if view == View::Activity && (options.query.search.is_some() || paged) {
        bail!("--search and --page do not apply to --activity; use --limit instead");
    }
    options.query.status = status.map(|raw| view.status_class(&raw)).transpose()?;

    Ok(options)
}

fn print_help() {
    println!("agrotrace");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Skip the feed and use the seeded demo herd");
    println!("  --check                  Validate config and reach the feed, then exit");
    println!("  --readings               Show the RFID reading log instead of the roster");
    println!("  --health                 Show the veterinary checkup log");
    println!("  --activity               Show recent herd activity");
    println!("  --search <text>          Match the text columns of the chosen view");
    println!("  --status <name>          Roster: healthy, observation, critical or quarantine");
    println!("                           Readings: ok, weak or error");
    println!("                           Health: completed, pending, urgent or scheduled");
    println!("  --breed <name>           Exact breed (roster)");
    println!("  --location <name>        Exact reader location (readings)");
    println!("  --vet <name>             Exact veterinarian (health)");
    println!("  --page <n>               Page of the filtered list (default 1)");
    println!("  --limit <n>              Activity entries to show (default 15)");
    println!("  --stats                  Print totals above the table");
    println!("  --json                   Print the page and totals as JSON");
    println!("  --help                   Show this help");
    println!();
    println!("Set AGROTRACE_LOG (for example AGROTRACE_LOG=debug) to see diagnostics.");
}
