use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use maildash::config::{load_config, resolve_flags_path};
use maildash::domain::email::FlagUpdate;
use maildash::domain::query::{DateRange, EmailQueryParams, SortDir, SortField};
use maildash::mail::fetcher::{DataSource, EmailFetcher};
use maildash::mutate::{MutationCoordinator, StubRemoteService, UpdateOutcome};
use maildash::query;
use maildash::store::json_file::JsonFileFlagStore;

#[derive(Parser)]
#[command(name = "maildash")]
#[command(about = "Inbox viewer: fetch, filter, sort, paginate, flag", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Subject,
    Sender,
    Date,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirArg {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum Command {
    /// List emails with filters, sorting and pagination
    List {
        /// Match sender or subject (case-insensitive substring)
        #[arg(long)]
        search: Option<String>,

        /// Match sender only
        #[arg(long)]
        sender: Option<String>,

        /// Match subject only
        #[arg(long)]
        subject: Option<String>,

        /// Lower date bound, inclusive (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        from: Option<DateTime<Utc>>,

        /// Upper date bound, inclusive
        #[arg(long, value_parser = parse_date)]
        to: Option<DateTime<Utc>>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,

        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        #[arg(long, value_enum, default_value = "asc")]
        dir: DirArg,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page size (defaults to page_size from config, then 25)
        #[arg(long)]
        limit: Option<u32>,

        /// Emit the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Set or clear read/favorite flags on one or more emails
    Flag {
        /// Email ids to update
        #[arg(required = true)]
        ids: Vec<String>,

        /// true marks read, false marks unread
        #[arg(long)]
        read: Option<bool>,

        /// true favorites, false unfavorites
        #[arg(long)]
        favorite: Option<bool>,
    },
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("not a date: {s} (expected YYYY-MM-DD or RFC 3339)"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let store = Arc::new(JsonFileFlagStore::new(resolve_flags_path(&cfg)?));
    let fetcher = EmailFetcher::new(DataSource::parse(&cfg.data_url), store.clone());

    match cli.cmd {
        Command::List {
            search,
            sender,
            subject,
            from,
            to,
            favorites,
            sort,
            dir,
            page,
            limit,
            json,
        } => {
            let emails = fetcher.fetch()?;

            let date = (from.is_some() || to.is_some()).then_some(DateRange { from, to });
            let params = EmailQueryParams {
                limit: limit.or(cfg.page_size).unwrap_or(25).max(1),
                page: page.max(1),
                search,
                sender,
                subject,
                date,
                sort_by: sort.map(|s| match s {
                    SortArg::Subject => SortField::Subject,
                    SortArg::Sender => SortField::Sender,
                    SortArg::Date => SortField::Date,
                }),
                sort_dir: match dir {
                    DirArg::Asc => SortDir::Asc,
                    DirArg::Desc => SortDir::Desc,
                },
                is_favorite: favorites.then_some(true),
            };

            let result = query::apply(&emails, &params);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            for email in &result.emails {
                let markers = format!(
                    "{}{}",
                    if email.is_favorite { "*" } else { " " },
                    if email.is_read { " " } else { "N" },
                );
                println!(
                    "{markers} {:<10} {:<22} {:<28.28} {:.48}",
                    email.id,
                    email.date.format("%m/%d/%Y %I:%M %p"),
                    email.sender,
                    email.subject,
                );
            }
            println!(
                "page {} of {} ({} matching)",
                result.meta.page, result.meta.total_pages, result.meta.total
            );
            Ok(())
        }

        Command::Flag { ids, read, favorite } => {
            let update = FlagUpdate {
                is_favorite: favorite,
                is_read: read,
            };
            if update.is_empty() {
                return Err(anyhow!("nothing to change: pass --read and/or --favorite"));
            }

            let mut emails = fetcher.fetch()?;
            let coord = MutationCoordinator::new(store, Arc::new(StubRemoteService));

            for (id, outcome) in coord.update_many(&mut emails, &ids, update)? {
                match outcome {
                    UpdateOutcome::Applied => println!("{id}: applied"),
                    UpdateOutcome::RolledBack(reason) => {
                        println!("{id}: rolled back ({reason})")
                    }
                }
            }
            Ok(())
        }
    }
}
