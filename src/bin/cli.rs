// src/bin/cli.rs
use color_eyre::config::HookBuilder;

fn main() -> color_eyre::Result<()> {
    HookBuilder::default().display_env_section(false).install()?;
    gender_rank::cli::run()
}
