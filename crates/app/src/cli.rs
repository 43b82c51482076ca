use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(long, default_value = "serve")]
    pub mode: Mode,
    /// Start serving without applying pending database migrations.
    #[arg(long, default_value_t = false)]
    pub skip_migrations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Serve,
    Migrate,
}

impl Mode {
    pub fn serve(self) -> bool {
        matches!(self, Mode::Serve)
    }

    pub fn migrate(self, skip_migrations: bool) -> bool {
        match self {
            Mode::Serve => !skip_migrations,
            Mode::Migrate => true,
        }
    }
}
