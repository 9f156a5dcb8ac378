use stepmark::{Locator, ParameterNames, Template, Value};

use crate::case::{Case, FormatCase, LocateCase};

#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Passed,
    Failed(String),
    Skipped(String),
}

pub fn run_case(case: &Case) -> TestResult {
    match case {
        Case::Format(case) => run_format(case),
        Case::Locate(case) => run_locate(case),
    }
}

fn parameter_names(case: &FormatCase) -> ParameterNames {
    match (&case.params, &case.signature) {
        (Some(names), _) => ParameterNames::new(names.iter().map(String::as_str)),
        (None, Some(signature)) => ParameterNames::from_signature(signature),
        (None, None) => ParameterNames::default(),
    }
}

fn run_format(case: &FormatCase) -> TestResult {
    let params = parameter_names(case);
    let args: Vec<Value> = case.args.iter().cloned().map(Value::from).collect();
    let rendered = Template::parse(case.template.as_str()).render(&params, &args);

    match (rendered, &case.expect, &case.error) {
        (_, None, None) => TestResult::Skipped("fixture has neither expect nor error".into()),
        (Ok(text), Some(expected), _) if &text == expected => TestResult::Passed,
        (Ok(text), Some(expected), _) => {
            TestResult::Failed(format!("expected {expected:?} but got {text:?}"))
        }
        (Ok(text), None, Some(kind)) => {
            TestResult::Failed(format!("expected {kind} but rendered {text:?}"))
        }
        (Err(err), None, Some(kind)) => {
            if err.kind() != kind.as_str() {
                return TestResult::Failed(format!("expected {kind} but got {}: {err}", err.kind()));
            }
            let message = err.to_string();
            match case.mentions.iter().find(|m| !message.contains(m.as_str())) {
                Some(missing) => {
                    TestResult::Failed(format!("error {message:?} does not mention {missing:?}"))
                }
                None => TestResult::Passed,
            }
        }
        (Err(err), Some(_), _) => TestResult::Failed(format!("{}: {err}", err.kind())),
    }
}

fn run_locate(case: &LocateCase) -> TestResult {
    let locator = match &case.ignore {
        Some(patterns) => Locator::with_ignored_only(patterns.iter().map(String::as_str)),
        None => Locator::new(),
    }
    .with_own_frame_depth(case.skip);

    let found = locator.locate(&case.trace);
    if found == case.expect {
        return TestResult::Passed;
    }

    let show = |loc: &Option<stepmark::SourceLocation>| {
        loc.as_ref()
            .map_or_else(|| "no location".to_string(), ToString::to_string)
    };
    TestResult::Failed(format!(
        "expected {} but got {}",
        show(&case.expect),
        show(&found)
    ))
}
