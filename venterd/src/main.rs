use std::path::PathBuf;
use std::process::{ExitCode, Termination};
use venter_common::config::Database;
use venter_infrastructure::tracing::init_tracing;
use venter_module_storage::config::StorageConfig;
use venter_server::{fixture, InitData};

#[allow(clippy::large_enum_variant)]
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the API server
    Api(venter_server::Run),
    /// Onboard the organisations of a JSON fixture
    LoadFixture(LoadFixture),
}

#[derive(clap::Args, Debug)]
pub struct LoadFixture {
    /// The fixture file
    pub file: PathBuf,

    #[command(flatten)]
    pub database: Database,

    #[command(flatten)]
    pub storage: StorageConfig,
}

impl LoadFixture {
    async fn run(self) -> anyhow::Result<ExitCode> {
        let fixture = fixture::Fixture::from_file(&self.file).await?;
        let context = InitData::new(self.database, self.storage).await?;

        let created = fixture::load(fixture, &context.db, context.storage).await?;
        log::info!("loaded {created} organisation(s) from {}", self.file.display());

        Ok(ExitCode::SUCCESS)
    }
}

#[derive(clap::Parser, Debug)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "venterd",
    long_about = None
)]
pub struct Venterd {
    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Venterd {
    async fn run(self) -> ExitCode {
        init_tracing();

        match self.run_command().await {
            Ok(code) => code,
            Err(err) => {
                log::error!("Error: {err}");
                for (n, err) in err.chain().skip(1).enumerate() {
                    if n == 0 {
                        log::error!("Caused by:");
                    }
                    log::error!("\t{err}");
                }

                ExitCode::FAILURE
            }
        }
    }

    async fn run_command(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Api(run) => run.run().await,
            Command::LoadFixture(load) => load.run().await,
        }
    }
}

#[actix_web::main]
async fn main() -> impl Termination {
    use clap::Parser;
    Venterd::parse().run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Venterd::command().debug_assert();
    }

    #[test]
    fn parse_load_fixture() {
        let cli = Venterd::try_parse_from(["venterd", "load-fixture", "etc/fixtures/venter.json"])
            .expect("must parse");

        assert!(matches!(
            cli.command,
            Command::LoadFixture(LoadFixture { ref file, .. }) if file == &PathBuf::from("etc/fixtures/venter.json")
        ));
    }
}
