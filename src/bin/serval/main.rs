mod cli;

use std::error::Error;
use std::process::exit;

use clap::Parser as ClapParser;
use log::{error, info};

use cli::Cli;
use serval::repl::{load, repl};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    simple_logger::init_with_level((&args.verbosity).into())?;

    let env = serval::new_interpreter();

    match &args.script {
        Some(path) => {
            info!("running script '{}'", path.display());
            if let Err(e) = load(&path.to_string_lossy(), &env) {
                error!("{e}");
                exit(1);
            }
        }
        None => repl(&env),
    }

    Ok(())
}
