use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use preview_render::logging::init_logging;
use preview_render::render::DEFAULT_TEMPLATE;
use preview_render::{RenderJob, SessionBuilder};

/// Render the preview template with the text from a config file.
#[derive(Parser, Debug)]
#[command(name = "render", version, about)]
struct Args {
    /// Config file; the `.json` extension may be omitted.
    config: PathBuf,

    /// HTML template to fill, relative to the working directory.
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Chrome or Chromium executable to launch instead of auto-detecting one.
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Seconds to wait for the template to become ready.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: Args) -> preview_render::Result<()> {
    let mut session = SessionBuilder::new().timeout(Duration::from_secs(args.timeout));
    if let Some(chrome) = args.chrome {
        session = session.chrome_path(chrome);
    }

    RenderJob::load(&args.config)
        .await?
        .template(args.template)
        .session(session.build_config())
        .run()
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
