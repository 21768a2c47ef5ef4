use anyhow::Result;
use vergen_gix::{BuildBuilder, CargoBuilder, Emitter};

fn main() -> Result<()> {
    let build = BuildBuilder::all_build()?;
    let cargo = CargoBuilder::all_cargo()?;
    Emitter::default().add_instructions(&build)?.add_instructions(&cargo)?.emit()
}
