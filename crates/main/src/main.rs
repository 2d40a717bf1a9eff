use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use duplicata::layout;
use duplicata::surface::recording::RecordingSurface;
use duplicata::{Command, CreditorStore, InvoiceRecord, Outcome, Party, PdfBuilder, Session};

/// Generates Duplicata de Venda Mercantil PDFs from JSON records.
///
/// Fonts are looked up in `DUPLICATA_FONTS_DIR`, next to the executable under
/// `assets/fonts`, or in the library crate's `assets/fonts`.  Set `RUST_LOG`
/// to see what the library does.
#[derive(Parser)]
#[command(author, version, about = "Duplicata de Venda Mercantil generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a record, render it and write `duplicata-<number>.pdf`.
    Generate {
        /// JSON file with the record.
        record: PathBuf,

        /// Directory the PDF is written to.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Use the saved creditor at this position instead of the record's.
        #[arg(long)]
        creditor: Option<usize>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the draw operations for a record without rendering a PDF.
    Layout {
        /// JSON file with the record.
        record: PathBuf,
    },

    /// Manage saved creditors.
    #[command(subcommand)]
    Creditors(CreditorCommands),
}

#[derive(Subcommand)]
enum CreditorCommands {
    /// List saved creditors with their positions.
    List {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Save a creditor.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        doc: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        zip: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Remove the creditor at a position.
    Remove {
        index: usize,

        /// Confirm the removal.
        #[arg(long)]
        yes: bool,

        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
struct StoreArgs {
    /// Creditor file; defaults to `DUPLICATA_CREDITORS_FILE` or the user data directory.
    #[arg(long = "store", value_name = "FILE")]
    path: Option<PathBuf>,
}

impl StoreArgs {
    fn open(&self) -> CreditorStore {
        match &self.path {
            Some(path) => CreditorStore::open(path),
            None => CreditorStore::open_default(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            record,
            out_dir,
            creditor,
            store,
        } => generate(record, out_dir, creditor, &store),
        Commands::Layout { record } => print_layout(record),
        Commands::Creditors(command) => creditors(command),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn generate(
    record: PathBuf,
    out_dir: PathBuf,
    creditor: Option<usize>,
    store: &StoreArgs,
) -> Result<(), Box<dyn Error>> {
    let record = InvoiceRecord::from_json_file(record)?;
    let builder = PdfBuilder::new().with_output_dir(out_dir);
    let mut session = Session::new(store.open(), builder).with_record(record);

    if let Some(index) = creditor {
        expect_success(session.handle(Command::SelectCreditor(index)))?;
    }
    match expect_success(session.handle(Command::Generate))? {
        Outcome::Generated { path } => println!("{}", path.display()),
        other => log::debug!("Unexpected outcome {:?}", other),
    }
    Ok(())
}

fn print_layout(record: PathBuf) -> Result<(), Box<dyn Error>> {
    let record = InvoiceRecord::from_json_file(record)?;
    let mut surface = RecordingSurface::default();
    layout::generate(&record, &mut surface)?;
    for op in surface.ops() {
        println!("{}", op);
    }
    Ok(())
}

fn creditors(command: CreditorCommands) -> Result<(), Box<dyn Error>> {
    match command {
        CreditorCommands::List { store } => {
            let store = store.open();
            if store.is_empty() {
                println!("No saved creditors in {}", store.path().display());
            }
            for (index, creditor) in store.list().iter().enumerate() {
                println!("{:>3}  {}  {}", index, creditor.name, creditor.doc);
            }
        }
        CreditorCommands::Add {
            name,
            doc,
            address,
            city,
            state,
            zip,
            store,
        } => {
            let creditor = Party::new(name)
                .with_doc(doc)
                .with_address(address)
                .with_locality(city, state, zip);
            let mut session = Session::new(store.open(), PdfBuilder::new());
            if let Outcome::CreditorAdded(creditor) =
                expect_success(session.handle(Command::AddCreditor(creditor)))?
            {
                println!("Saved {} as #{}", creditor.name, session.store().len() - 1);
            }
        }
        CreditorCommands::Remove { index, yes, store } => {
            let mut session = Session::new(store.open(), PdfBuilder::new());
            let outcome = session.handle(Command::RemoveCreditor {
                index,
                confirmed: yes,
            });
            if let Outcome::CreditorRemoved(creditor) = expect_success(outcome)? {
                println!("Removed {}", creditor.name);
            }
        }
    }
    Ok(())
}

/// Turns refusals and failures into errors for the exit path.
fn expect_success(outcome: Outcome) -> Result<Outcome, Box<dyn Error>> {
    match outcome {
        Outcome::Blocked { message } | Outcome::Failed { message } => Err(message.into()),
        Outcome::ConfirmationRequired { question } => {
            Err(format!("{} Pass --yes to confirm.", question).into())
        }
        outcome => Ok(outcome),
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
