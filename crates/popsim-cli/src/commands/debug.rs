use crate::cli::DebugArgs;
use crate::error::Result;
use std::io::{self, Write};
use stdpopsim::catalog;
use tracing::info;

pub fn run(args: DebugArgs) -> Result<()> {
    let species = catalog::get_species(&args.species)?;
    let model = species.resolve_model(args.model.as_deref())?;
    info!("Debugging model '{}' of {}", model.id, species.name);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", model)?;
    writeln!(out)?;
    model.debug(&mut out)?;
    Ok(())
}
