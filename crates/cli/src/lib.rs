use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doc_model::{AttributeEntry, Extract, ExtractField, Selection, TagScheme, Token, TokenUnit};
use pdf_engine::PdfEngineError;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use viewer_core::{SelectionFeed, SessionConfig, TokenSession};
use xplore_core::{DocumentList, DocumentRecord, ExtractForm, IngestConfig, Ingestor};

#[derive(Debug, Parser)]
#[command(name = "xplore")]
#[command(about = "Explore PDF metadata and page text")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import PDFs and list the accepted documents.
    Import {
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Read additional locations from a file, one per line.
        #[arg(long, value_name = "PATH")]
        list: Option<PathBuf>,
        #[arg(long)]
        sort_attributes: bool,
    },
    /// Print the file and PDF attributes of a document.
    Attributes {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = AttributeSource::All)]
        source: AttributeSource,
        #[arg(long)]
        sort_attributes: bool,
    },
    /// Print the tagged tokens of a page as JSON.
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        page: PageArgs,
        /// Token ids to join into a selection string.
        #[arg(long, value_delimiter = ',', value_name = "IDS")]
        select: Vec<u32>,
    },
    /// Edit a document's extract and print the committed result as JSON.
    Extract {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        authors: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long = "abstract")]
        abstract_text: Option<String>,
        #[command(flatten)]
        page: PageArgs,
        /// Token ids of the page to drop into `--into`.
        #[arg(long, value_delimiter = ',', value_name = "IDS")]
        pick: Vec<u32>,
        /// Viewer selection text to drop into `--into`.
        #[arg(long)]
        selection: Option<String>,
        #[arg(long, value_enum, default_value_t = FieldArg::Abstract)]
        into: FieldArg,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, clap::Args)]
struct PageArgs {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    unit: Option<TokenUnit>,
    #[arg(long)]
    scheme: Option<TagScheme>,
    /// ISO 639-3 code used when the page language cannot be detected.
    #[arg(long)]
    language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AttributeSource {
    File,
    Pdf,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FieldArg {
    Title,
    Authors,
    Keywords,
    Abstract,
}

impl From<FieldArg> for ExtractField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Title => ExtractField::Title,
            FieldArg::Authors => ExtractField::Authors,
            FieldArg::Keywords => ExtractField::AuthorKeywords,
            FieldArg::Abstract => ExtractField::Abstract,
        }
    }
}

#[derive(Debug, Serialize)]
struct TokensOutput<'a> {
    page: u32,
    page_count: u32,
    language: &'a str,
    unit: TokenUnit,
    scheme: TagScheme,
    available_schemes: &'a [TagScheme],
    tokens: &'a [Token],
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtractOutput<'a> {
    id: u32,
    file_name: &'a str,
    committed: Vec<String>,
    extract: &'a Extract,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    match cli.command {
        Commands::Import { files, list, sort_attributes } => {
            run_import(files, list.as_deref(), sort_attributes)
        }
        Commands::Attributes { file, source, sort_attributes } => {
            run_attributes(&file, source, sort_attributes)
        }
        Commands::Tokens { file, page, select } => run_tokens(&file, &page, &select),
        Commands::Extract {
            file,
            title,
            authors,
            keywords,
            abstract_text,
            page,
            pick,
            selection,
            into,
        } => {
            let edits = [
                (ExtractField::Title, title),
                (ExtractField::Authors, authors),
                (ExtractField::AuthorKeywords, keywords),
                (ExtractField::Abstract, abstract_text),
            ];
            run_extract(&file, edits, &page, &pick, selection, into.into())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when `run` is called more than once.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn ingest_config(sort_attributes: bool) -> Result<IngestConfig> {
    let config = IngestConfig::from_env().context("invalid ingest configuration")?;
    Ok(if sort_attributes { config.with_sorted_attributes(true) } else { config })
}

fn run_import(mut files: Vec<PathBuf>, list: Option<&Path>, sort_attributes: bool) -> Result<()> {
    let mut docs = DocumentList::new();

    if let Some(list) = list {
        match fs::read_to_string(list) {
            Ok(contents) => files.extend(
                contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(PathBuf::from),
            ),
            Err(err) => {
                docs.record_picker_error(&format!(
                    "cannot read file list {}: {err}",
                    list.display()
                ));
                anyhow::bail!("{}", docs.status());
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("no files to import");
    }

    let ingestor = Ingestor::new().with_config(ingest_config(sort_attributes)?);
    let rejected = docs.import(&ingestor, &files);

    for doc in docs.iter() {
        println!(
            "{}\t{}\t{} file attributes\t{} PDF attributes",
            doc.id(),
            doc.file_name(),
            doc.file_attributes().len(),
            doc.pdf_attributes().len()
        );
    }

    for rejection in &rejected {
        tracing::info!(error = %rejection.error, "rejected");
    }
    if !docs.status().is_empty() {
        eprintln!("{}", docs.status());
    }

    Ok(())
}

fn import_one(file: &Path, config: IngestConfig) -> Result<DocumentList> {
    let mut docs = DocumentList::new();
    let ingestor = Ingestor::new().with_config(config);

    if let Some(rejection) = docs.import(&ingestor, &[file]).into_iter().next() {
        return Err(anyhow::Error::new(rejection.error))
            .with_context(|| format!("failed to import {}", file.display()));
    }

    Ok(docs)
}

fn first_record(docs: &DocumentList) -> Result<&DocumentRecord> {
    docs.iter().next().context("no document imported")
}

fn run_attributes(file: &Path, source: AttributeSource, sort_attributes: bool) -> Result<()> {
    let docs = import_one(file, ingest_config(sort_attributes)?)?;
    let doc = first_record(&docs)?;

    match source {
        AttributeSource::File => print_attributes(doc.file_attributes()),
        AttributeSource::Pdf => print_attributes(doc.pdf_attributes()),
        AttributeSource::All => {
            println!("File attributes:");
            print_attributes(doc.file_attributes());
            println!("PDF attributes:");
            print_attributes(doc.pdf_attributes());
        }
    }

    Ok(())
}

fn print_attributes(entries: &[AttributeEntry]) {
    for entry in entries {
        println!("{}\t{}", entry.id, entry.display_line());
    }
}

fn session_config(args: &PageArgs) -> Result<SessionConfig> {
    let mut config = SessionConfig::from_env().context("invalid session configuration")?;

    if let Some(unit) = args.unit {
        config = config.with_token_unit(unit);
    }
    if let Some(scheme) = args.scheme {
        config = config.with_scheme(scheme);
    }
    if let Some(language) = &args.language {
        config = config.with_fallback_language(doc_model::Language::new(language.as_str()));
    }

    Ok(config)
}

/// Opens a session on the requested page of `doc`.
fn open_page(doc: &DocumentRecord, args: &PageArgs) -> Result<TokenSession> {
    if args.page == 0 {
        anyhow::bail!("--page is 1-based and must be >= 1");
    }

    let page_count = doc.document().page_count();
    let page_index = args.page - 1;
    if page_index >= page_count {
        return Err(PdfEngineError::PageOutOfRange { page: args.page, page_count }.into());
    }

    let mut session = TokenSession::new(session_config(args)?);
    session.load_page(doc.document(), page_index);
    Ok(session)
}

fn run_tokens(file: &Path, page: &PageArgs, select: &[u32]) -> Result<()> {
    let docs = import_one(file, IngestConfig::default())?;
    let doc = first_record(&docs)?;
    let mut session = open_page(doc, page)?;

    let selection = (!select.is_empty()).then(|| {
        session.select_tokens(select.iter().copied());
        session.materialize_selection()
    });

    let loaded = session.page().context("page not loaded")?;
    let payload = TokensOutput {
        page: loaded.index + 1,
        page_count: loaded.page_count,
        language: loaded.language.code(),
        unit: session.token_unit(),
        scheme: session.scheme(),
        available_schemes: session.available_schemes(),
        tokens: session.tokens(),
        selection,
    };

    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");

    Ok(())
}

fn run_extract(
    file: &Path,
    edits: [(ExtractField, Option<String>); 4],
    page: &PageArgs,
    pick: &[u32],
    selection: Option<String>,
    into: ExtractField,
) -> Result<()> {
    let mut docs = import_one(file, IngestConfig::default())?;
    let id = first_record(&docs)?.id();

    let mut dropped = Vec::new();
    if !pick.is_empty() || selection.is_some() {
        let doc = first_record(&docs)?;
        let mut session = open_page(doc, page)?;

        if !pick.is_empty() {
            session.select_tokens(pick.iter().copied());
            dropped.push(session.materialize_selection());
        }

        if let Some(text) = selection {
            let feed = SelectionFeed::new();
            session.attach(&feed);
            feed.publish(Some(Selection::new(text).on_page(page.page - 1)));
            dropped.extend(session.selection().map(|selection| selection.text));
        }
    }

    let record = docs.get_mut(id).context("imported document disappeared")?;
    let mut form = ExtractForm::load(&record.extract);
    for (field, value) in edits {
        if let Some(value) = value {
            form.set(field, value);
        }
    }
    if !dropped.is_empty() && !form.drop_strings(into, dropped.as_slice()) {
        tracing::warn!(field = %into, "nothing to drop");
    }

    let committed = form.commit(&mut record.extract);
    let payload = ExtractOutput {
        id: record.id(),
        file_name: record.file_name(),
        committed: committed.iter().map(ToString::to_string).collect(),
        extract: &record.extract,
    };

    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");

    Ok(())
}
