mod completer;
mod helper;
mod highlighter;
mod hinter;

use std::cell::RefCell;
use std::rc::Rc;

use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::{Config, EditMode, Editor};
use stepmark::ParameterNames;

use self::helper::ReplHelper;
use crate::session::{Session, parse_arg_list};

pub fn run() -> Result<(), ReadlineError> {
    let config = Config::builder()
        .history_ignore_dups(true)?
        .completion_type(rustyline::CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let session = Rc::new(RefCell::new(Session::default()));
    let mut rl: Editor<ReplHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(ReplHelper::new(Rc::clone(&session))));

    println!(
        "{} {}",
        "stepmark".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!("{}", "Type .help for REPL commands".bright_black());

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if trimmed.starts_with('.') {
                    if !handle_command(trimmed, &mut session.borrow_mut()) {
                        break;
                    }
                    continue;
                }

                render_line(&session.borrow(), &line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "bye".bright_black());
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

pub const COMMANDS: [&str; 7] = [
    ".params", ".signature", ".args", ".show", ".clear", ".help", ".exit",
];

/// Returns `false` when the REPL should stop.
fn handle_command(trimmed: &str, session: &mut Session) -> bool {
    let (command, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(c, r)| (c, r.trim()));

    match command {
        ".exit" => return false,
        ".help" => {
            println!("{}", ".params a b          declare parameter names".bright_blue());
            println!(
                "{}",
                ".signature fn f(a)   take parameter names from a signature".bright_blue()
            );
            println!(
                "{}",
                ".args 1 \"x\" {..}     set argument values (JSON)".bright_blue()
            );
            println!("{}", ".show                show parameters and arguments".bright_blue());
            println!("{}", ".clear               reset parameters and arguments".bright_blue());
            println!("{}", ".exit                exit REPL".bright_blue());
            println!("{}", "anything else is rendered as a template".bright_black());
        }
        ".params" => {
            session.params = ParameterNames::new(rest.split_whitespace());
            println!("{}", session.describe().bright_black());
        }
        ".signature" => {
            session.params = ParameterNames::from_signature(rest);
            println!("{}", session.describe().bright_black());
        }
        ".args" => {
            session.args = parse_arg_list(rest);
            println!("{}", session.describe().bright_black());
        }
        ".show" => println!("{}", session.describe()),
        ".clear" => {
            *session = Session::default();
            println!("{}", "session cleared".green());
        }
        other => eprintln!(
            "{} unknown command '{}' (try .help)",
            "error:".red().bold(),
            other.yellow()
        ),
    }
    true
}

fn render_line(session: &Session, template: &str) {
    match session.render(template) {
        Ok(text) => println!("{}", text.bright_white()),
        Err(err) => eprintln!("{:?}", miette::Report::new(err)),
    }
}

/// An unclosed `{{` or `[[` at the end of the line.
pub fn needs_more_input(source: &str) -> bool {
    let unclosed = |open: &str, close: &str| match source.rfind(open) {
        Some(at) => !source[at + open.len()..].contains(close),
        None => false,
    };
    unclosed("{{", "}}") || unclosed("[[", "]]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepmark::Value;

    #[test]
    fn unclosed_placeholders_need_more_input() {
        assert!(needs_more_input("Log in as {{user"));
        assert!(needs_more_input("Item [[0"));
        assert!(!needs_more_input("Log in as {{user}}"));
        assert!(!needs_more_input("plain"));
    }

    #[test]
    fn commands_update_the_session() {
        let mut session = Session::default();
        assert!(handle_command(".params user id", &mut session));
        assert!(handle_command(r#".args {"name": "Bob"} 7"#, &mut session));
        assert_eq!(session.params.as_slice(), &["user", "id"]);
        assert_eq!(session.args[1], Value::Number(7.0));
        assert!(!handle_command(".exit", &mut session));
    }

    #[test]
    fn signature_command_parses_names() {
        let mut session = Session::default();
        handle_command(".signature fn login(&self, user: &User)", &mut session);
        assert_eq!(session.params.as_slice(), &["user"]);
    }
}
