#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_errs::template::{arity, render_lenient, render_strict};
use std::fmt::Display;

fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let Ok(template) = std::str::from_utf8(rest) else {
        return;
    };

    let args: Vec<usize> = (0..usize::from(count % 8)).collect();
    let refs: Vec<&dyn Display> = args.iter().map(|a| a as &dyn Display).collect();

    let strict = render_strict(template, &refs);
    let lenient = render_lenient(template, &refs);

    // Whenever strict succeeds, lenient agrees with it.
    if let Ok(message) = strict {
        assert_eq!(message, lenient);
        assert_eq!(arity(template).ok(), Some(refs.len()));
    }
});
