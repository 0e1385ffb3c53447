use anyhow::Result;
use human_panic::setup_panic;
use log::debug;

use text_workflow::prelude::*;
use text_workflow::web;

fn main() -> Result<()> {
    setup_panic!();

    // Variables from .env reach the external program unless a session
    // overrides or clears them.
    let dotenv = dotenvy::dotenv();

    let matches = get_matches()?;
    init_logger(&get_log_settings(&matches)?)?;

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    let settings = Settings::from_matches(&matches)?;

    match get_mode(&matches)? {
        Mode::Serve => {
            debug!("Starting web form with {}", settings.entry_point);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::serve(settings.workspace(), settings.bind))?;
            Ok(())
        }
        Mode::List => list_command(&settings),
        Mode::Run {
            input,
            workflow,
            output,
        } => run_command(&settings, &input, &workflow, output.as_deref()),
    }
}
