use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use finanswer::{
    config::Config,
    controller::{AnalyzeOutcome, ControllerSettings, PopupController, TerminalView},
    health::check_server,
    page::{LocalPage, PageTextSource, RemotePage},
    relay::{AnalysisRelay, RemoteSentimentService, UserFeedback},
};

/// Financial news sentiment for any web page.
#[derive(Parser)]
#[command(name = "finanswer")]
#[command(version, about = "Analyze the sentiment of a financial news page")]
struct Cli {
    /// Sentiment server address (overrides FINANSWER_SERVER_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a page's text and analyze it.
    Analyze {
        #[command(flatten)]
        page: PageArgs,

        /// Rate the result as `accurate` or `inaccurate` once it is shown.
        #[arg(long)]
        feedback: Option<UserFeedback>,
    },
    /// Print the text that would be sent for analysis.
    Extract {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Check whether the sentiment server is up.
    Health,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PageArgs {
    /// Page URL.
    url: Option<String>,

    /// Local HTML file instead of a URL.
    #[arg(long)]
    file: Option<PathBuf>,
}

enum PageSource {
    Url(String),
    File(PathBuf),
}

impl PageArgs {
    fn into_source(self) -> Result<PageSource> {
        match (self.url, self.file) {
            (_, Some(path)) => Ok(PageSource::File(path)),
            (Some(url), None) => Ok(PageSource::Url(url)),
            (None, None) => anyhow::bail!("a page URL or --file is required"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::from_env()?;
    if let Some(server) = &cli.server {
        config = config.with_server_url(server)?;
    }

    match cli.command {
        Command::Health => health(&config).await,
        Command::Extract { page } => match page.into_source()? {
            PageSource::Url(url) => extract(RemotePage::new(url)).await,
            PageSource::File(path) => extract(LocalPage::new(path)).await,
        },
        Command::Analyze { page, feedback } => match page.into_source()? {
            PageSource::Url(url) => analyze(&config, RemotePage::new(url), feedback).await,
            PageSource::File(path) => analyze(&config, LocalPage::new(path), feedback).await,
        },
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn health(config: &Config) -> Result<ExitCode> {
    let relay = AnalysisRelay::from_config(config);
    let status = check_server(&relay, config.server_url()).await;

    if status.is_running() {
        println!("Server is running at {}", config.server_url());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Server at {} is not available ({status:?})", config.server_url());
        Ok(ExitCode::FAILURE)
    }
}

async fn extract<P: PageTextSource>(page: P) -> Result<ExitCode> {
    let text = page.page_text().await.into_result()?;
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}

async fn analyze<P: PageTextSource>(
    config: &Config,
    page: P,
    feedback: Option<UserFeedback>,
) -> Result<ExitCode> {
    let service = RemoteSentimentService::new(
        AnalysisRelay::from_config(config),
        config.server_url().clone(),
    );
    let controller = PopupController::new(
        service,
        page,
        TerminalView::stdout(),
        ControllerSettings::from_config(config),
    );

    match controller.analyze().await {
        AnalyzeOutcome::Displayed(_) => {
            if let Some(feedback) = feedback {
                controller.submit_feedback(feedback).await;
            }
            Ok(ExitCode::SUCCESS)
        }
        AnalyzeOutcome::Failed(_) | AnalyzeOutcome::Busy => Ok(ExitCode::FAILURE),
    }
}
