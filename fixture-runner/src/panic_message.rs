use std::any::Any;

/// Text of a caught panic. `panic!` payloads are `&str` or `String`.
pub fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| msg.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn static_and_formatted_messages() {
        let payload = panic::catch_unwind(|| panic!("plain")).unwrap_err();
        assert_eq!(panic_reason(payload.as_ref()), "plain");

        let payload = panic::catch_unwind(|| panic!("case {}", 3)).unwrap_err();
        assert_eq!(panic_reason(payload.as_ref()), "case 3");
    }

    #[test]
    fn other_payloads_are_named() {
        let payload = panic::catch_unwind(|| panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_reason(payload.as_ref()), "non-string panic payload");
    }
}
