// Logging setup

use tracing::Level;

/// Log verbosity chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Maximum level emitted at this verbosity
    pub fn level(&self) -> Level {
        match self {
            Verbosity::Quiet => Level::WARN,
            Verbosity::Normal => Level::INFO,
            Verbosity::Verbose => Level::DEBUG,
        }
    }
}

/// Install the stderr subscriber; a second call is a no-op
pub fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::fmt;

    let verbosity = Verbosity::from_flags(verbose, quiet);
    let detailed = verbosity == Verbosity::Verbose;

    let _ = fmt()
        .with_max_level(verbosity.level())
        .with_target(detailed)
        .with_file(detailed)
        .with_line_number(detailed)
        .with_writer(std::io::stderr)
        .try_init();
}
