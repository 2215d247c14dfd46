use clap::{CommandFactory, Parser};
use std::ffi::OsStr;
use std::io::{self, IsTerminal};
use std::{env, fs, path::PathBuf};
use xq_lang::Invocation;

#[derive(Parser, Debug, Default)]
#[command(name = "xq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(after_help = "# Examples:\n\n\
    ## To pretty print a document:\n\
    xq < file.xml\n\n\
    ## To select elements:\n\
    xq '//item[@id]' file.xml\n\n\
    ## To print attribute values, one per line:\n\
    xq -r '//a/@href' page.html")]
#[command(
    about = "xq applies XPath queries to XML and HTML documents and pretty prints the result.",
    long_about = None
)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", default_value_t = false)]
    version: bool,

    /// Output plain text, one match per line. Only makes sense if the query selects text or attributes
    #[arg(short, long, default_value_t = false)]
    raw: bool,

    /// XPath query to apply to the document
    #[arg(value_name = "XPATH_QUERY")]
    query: Option<String>,

    /// XML or HTML file to process. Defaults to stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        tracing::debug!(cli = ?self, "parsed arguments");

        if self.version {
            println!("xq {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        let invocation = self.invocation(colorize()).unwrap_or_else(|err| err.exit());

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        invocation.run(&mut handle)?;

        Ok(())
    }

    /// Opens the input and collects the flags into an [`Invocation`].
    ///
    /// An unreadable file is reported as a usage error.
    pub fn invocation(&self, colorize: bool) -> Result<Invocation, clap::Error> {
        let invocation = match &self.file {
            Some(path) => {
                let file = fs::File::open(path).map_err(|e| {
                    Cli::command().error(
                        clap::error::ErrorKind::Io,
                        format!("can't open '{}': {}", path.display(), e),
                    )
                })?;
                Invocation::new(file)
            }
            None => Invocation::new(io::stdin()),
        };

        let invocation = invocation.raw(self.raw).colorize(colorize);
        Ok(match &self.query {
            Some(query) => invocation.query(query.as_str()),
            None => invocation,
        })
    }
}

/// Colour is only used on a terminal, and never when `NO_COLOR` is set.
fn colorize() -> bool {
    io::stdout().is_terminal() && env::var_os("NO_COLOR").as_deref().is_none_or(OsStr::is_empty)
}
