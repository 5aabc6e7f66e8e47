/// CLI module - command-line interface for abide
mod cli;

fn main() {
    cli::run_cli();
}
