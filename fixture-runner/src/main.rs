mod app;
mod case;
mod cli;
mod discovery;
mod execution;
mod panic_message;
mod runner;

fn main() {
    if !app::run() {
        std::process::exit(1);
    }
}
