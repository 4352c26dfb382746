//! `records`: list, add, edit, and delete user records from the terminal.
//!
//! Each command loads the current list, applies one action through the same
//! store, form, and table the library exposes, then prints any error and
//! the resulting table.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use records_client::config::ClientSettings;
use records_client::{
    FieldName, HttpUsersApi, SubmitOutcome, UserForm, UserRecord, UserStore, UserTable, UsersApi,
};

/// `records` command arguments.
#[derive(Debug, Parser)]
#[command(name = "records", about = "Manage user records", version)]
struct Cli {
    /// Base URL of the API. Overrides `RECORDS_API_URL` and `RECORDS_PORT`.
    #[arg(long = "api-url", value_name = "url", global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every record.
    List,
    /// Create a record.
    Add(FieldArgs),
    /// Change fields of an existing record.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Remove a record.
    Delete { id: String },
}

#[derive(Debug, Default, Args)]
struct FieldArgs {
    #[arg(long = "first-name", value_name = "name")]
    first_name: Option<String>,
    #[arg(long = "last-name", value_name = "name")]
    last_name: Option<String>,
    #[arg(long, value_name = "digits")]
    phone: Option<String>,
    #[arg(long, value_name = "address")]
    email: Option<String>,
}

impl FieldArgs {
    fn into_values(self) -> impl Iterator<Item = (FieldName, String)> {
        FieldName::ALL
            .into_iter()
            .zip([self.first_name, self.last_name, self.phone, self.email])
            .filter_map(|(field, value)| value.map(|value| (field, value)))
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(cli))
}

fn build_api(api_url: Option<String>) -> Result<HttpUsersApi> {
    let mut settings = ClientSettings::load_from_iter(std::env::args_os().take(1))
        .map_err(|error| eyre!("failed to load settings: {error}"))?;
    if api_url.is_some() {
        settings.api_url = api_url;
    }
    let base_url = settings.base_url().wrap_err("invalid API base URL")?;
    HttpUsersApi::new(&base_url, settings.timeout()).wrap_err("failed to build HTTP client")
}

/// Find the record to edit. A failed initial load is reported as such rather
/// than as a missing id.
fn editable_record<'a, A: UsersApi>(store: &'a UserStore<A>, id: &str) -> Result<&'a UserRecord> {
    if let Some(error) = store.error() {
        return Err(eyre!("{error}"));
    }
    store
        .records()
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| eyre!("no user with id {id}"))
}

async fn run(cli: Cli) -> Result<()> {
    let api = build_api(cli.api_url)?;
    let mut store = UserStore::mount(api).await;
    let mut table = UserTable::default();
    let mut form_errors = Vec::new();

    match cli.command {
        Command::List => {}
        Command::Add(fields) => {
            let mut form = UserForm::default();
            for (field, value) in fields.into_values() {
                form.change(field, value);
            }
            match form.submit(&mut store).await {
                SubmitOutcome::Created => {
                    if let Some(notice) = form.success_notice() {
                        println!("{notice}");
                    }
                }
                SubmitOutcome::Invalid => {
                    form_errors.extend(form.inputs().filter_map(|input| {
                        input.error.map(|error| format!("{}: {error}", input.label))
                    }));
                }
                SubmitOutcome::Failed => {}
            }
        }
        Command::Edit { id, fields } => {
            table.start_edit(editable_record(&store, &id)?);
            for (field, value) in fields.into_values() {
                table.change(field, value);
            }
            table.save(&mut store).await;
        }
        Command::Delete { id } => {
            // The store keeps the message; it is reported below.
            if let Err(error) = table.delete(&mut store, &id).await {
                debug!(%error, id = %id, "delete failed");
            }
        }
    }

    for line in &form_errors {
        eprintln!("{line}");
    }
    if let Some(error) = store.error() {
        eprintln!("{error}");
    }
    print!("{}", table.view(store.records()).render_text());

    match store.error() {
        Some(error) => Err(eyre!("{error}")),
        None if !form_errors.is_empty() => Err(eyre!("the record was not saved")),
        None => Ok(()),
    }
}
