// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Cat, Init, Ls, Mkdir, Put, Rm, Version};

command_enum! {
    (Init, Init),
    (Ls, Ls),
    (Cat, Cat),
    (Put, Put),
    (Mkdir, Mkdir),
    (Rm, Rm),
    (Version, Version),
}

// The store client drives its own runtime, so main stays synchronous.
fn main() {
    let args = Args::parse();
    let guard = logging::init_logging(args.log_level);

    // a missing .env is fine, a malformed one is not
    match state::load_dotenv() {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }

    let ctx = op::OpContext::new(args.config_path, args.backend);

    match args.command.execute(&ctx) {
        Ok(output) => {
            let output = output.to_string();
            if output.is_empty() || output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }
}
