use proptest::prelude::*;

use mirrorwatch::publish::include::{resolve_text, split_lines, IncludeUniverse};
use mirrorwatch::publish::TextEncoding;
use mirrorwatch::types::LineEnding;

// Lines that never contain the include marker or a line terminator.
fn plain_line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>!:.\\-éß]{0,20}".prop_filter("no marker", |s| !s.contains("<!-- include::"))
}

// A lone "\r" is left out: followed by an empty "\n"-terminated line it
// would merge into a single "\r\n".
fn terminator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("\r\n")]
}

proptest! {
    #[test]
    fn text_without_directives_only_changes_line_endings(
        lines in proptest::collection::vec((plain_line(), terminator()), 0..12)
    ) {
        let input: String = lines.iter().map(|(l, t)| format!("{l}{t}")).collect();
        let expected: String = lines.iter().map(|(l, _)| format!("{l}\n")).collect();

        let (out, stats) = resolve_text(&input, &IncludeUniverse::default(), LineEnding::Lf, |_| {
            panic!("no includes expected")
        })
        .unwrap();

        prop_assert_eq!(&out, &expected);
        prop_assert_eq!(stats.spliced + stats.dangling + stats.malformed, 0);

        // A second pass is a no-op.
        let (again, _) = resolve_text(&out, &IncludeUniverse::default(), LineEnding::Lf, |_| {
            panic!("no includes expected")
        })
        .unwrap();
        prop_assert_eq!(again, out);
    }

    #[test]
    fn split_lines_never_yields_terminators(text in "[ab\r\n]{0,40}") {
        for line in split_lines(&text) {
            prop_assert!(!line.contains('\n'));
            prop_assert!(!line.contains('\r'));
        }
    }

    #[test]
    fn bom_encodings_preserve_text(text in "\\PC{0,40}") {
        for enc in [TextEncoding::Utf8Bom, TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let bytes = enc.encode(&text);
            prop_assert_eq!(TextEncoding::from_prefix(&bytes), enc);
            prop_assert_eq!(enc.decode(&bytes), text.clone());
        }
    }
}
