//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::collection::OrderedCollection;
use crate::config::PaginatorConfig;
use crate::database::{DatabaseEngine, Row};
use crate::error::{Error, Result};
use crate::pagination::{Page, PageRequest, Paginator, Slot};
use crate::types::SortDirection;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Page {
                database,
                table,
                key,
                unique,
                desc,
                page,
                pk,
                count,
                query,
            } => {
                let db = self.open_database(database)?;
                let request = PageArgs {
                    table,
                    key,
                    unique: *unique,
                    desc: *desc,
                    page: *page,
                    pk: *pk,
                    count: *count,
                    query: query.as_deref().unwrap_or(""),
                };
                let result = self.page(&db, &request)?;
                println!("{}", render_page(&result, self.cli.format)?);
                Ok(())
            }
            Commands::Tables { database } => {
                let db = self.open_database(database)?;
                for table in db.list_tables()? {
                    println!("{table}");
                }
                Ok(())
            }
            Commands::Config => {
                print!("{}", self.paginator_config()?.to_yaml()?);
                Ok(())
            }
            Commands::Serve { database, port } => {
                let db = self.open_database(database)?;
                let paginator = Paginator::new(self.paginator_config()?)?;
                crate::cli::serve(db, paginator, *port).await
            }
        }
    }

    /// Effective configuration: config file first, then command-line overrides
    pub fn paginator_config(&self) -> Result<PaginatorConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PaginatorConfig::from_file(path)?,
            None => PaginatorConfig::default(),
        };

        if let Some(per_page) = self.cli.per_page {
            config.per_page = per_page;
        }
        if let Some(max_count) = self.cli.max_count {
            config.max_count = Some(max_count);
        }
        if self.cli.keyset {
            config.keyset = true;
        }
        if let Some(prefix) = &self.cli.prefix {
            config.var_prefix.clone_from(prefix);
        }

        config.validate()?;
        Ok(config)
    }

    /// Open the database and attach every `--attach ALIAS=PATH` file
    fn open_database(&self, database: &str) -> Result<DatabaseEngine> {
        let db = DatabaseEngine::open(database)?;
        for spec in &self.cli.attach {
            let (alias, path) = spec
                .split_once('=')
                .filter(|(alias, path)| !alias.is_empty() && !path.is_empty())
                .ok_or_else(|| {
                    Error::invalid_value("attach", format!("expected ALIAS=PATH, got '{spec}'"))
                })?;
            db.attach(path, alias)?;
        }
        Ok(db)
    }

    /// Paginate a table as described by the `page` command
    fn page(&self, db: &DatabaseEngine, args: &PageArgs<'_>) -> Result<Page<Row, i64>> {
        let paginator = Paginator::new(self.paginator_config()?)?;

        let mut collection = db.table(args.table, args.key, args.unique)?;
        if args.desc {
            collection = collection.order_by(args.key, SortDirection::Desc)?;
        }

        let mut request: PageRequest<i64> = paginator.request(args.query);
        if let Some(page) = args.page {
            request.page = page.max(1);
            request.anchor = None;
        }
        if let Some(pk) = args.pk {
            request.anchor = Some(pk);
        }
        if let Some(count) = args.count {
            request = request.with_count(count);
        }

        paginator.paginate(&collection, &request)
    }
}

/// Arguments of the `page` command
struct PageArgs<'a> {
    table: &'a str,
    key: &'a str,
    unique: bool,
    desc: bool,
    page: Option<u64>,
    pk: Option<i64>,
    count: Option<u64>,
    query: &'a str,
}

/// Render a page for the terminal
pub fn render_page(page: &Page<Row, i64>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(page)?),
        OutputFormat::Pretty => {
            let mut out = String::new();
            for row in &page.items {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            out.push_str(&format!(
                "Items {}-{} of {} ({:?})\n",
                page.first_index(),
                page.last_index(),
                page.count,
                page.mode
            ));
            out.push_str(&navigation_line(page));
            Ok(out)
        }
    }
}

/// One-line page navigation, the current page in brackets
pub fn navigation_line<T>(page: &Page<T, i64>) -> String {
    page.window
        .slots()
        .iter()
        .map(|slot| match slot {
            Slot::Page(link) if link.page == page.page => format!("[{}]", link.page),
            Slot::Page(link) => link.page.to_string(),
            Slot::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
