use anyhow::Result;

fn main() -> Result<()> {
    los_cli::main_entry()
}
