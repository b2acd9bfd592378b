use icd_extract::decompose::strip_separator;
use icd_extract::{CodeGrammar, DecomposedCode, ExtractError, IcdChapter, decompose, display_form};

fn sample_codes() -> Vec<String> {
    let mut codes = Vec::new();
    for letter in ['A', 'C', 'H', 'S', 'T', 'Z'] {
        for category in ["00", "45", "72"] {
            for body in ["0", "1", "00", "001", "0X1", "9A"] {
                codes.push(format!("{letter}{category}.{body}"));
                for extension in ['A', 'D', 'S'] {
                    codes.push(format!("{letter}{category}.{body}{extension}"));
                }
            }
        }
    }
    codes
}

fn concat_parts(parts: &DecomposedCode) -> String {
    let mut out = String::new();
    out.push(parts.part1);
    out.push_str(&parts.part2);
    out.push_str(parts.part3.as_deref().unwrap_or(""));
    if let Some(extension) = parts.part4 {
        out.push(extension);
    }
    out
}

#[test]
fn test_parts_reconstruct_every_grammar_code() {
    for code in sample_codes() {
        assert!(CodeGrammar::is_code(&code), "{code} should match the grammar");
        let parts = decompose(&code).unwrap();
        assert_eq!(concat_parts(&parts), code.replace('.', ""), "reconstructing {code}");
        assert_eq!(parts.reconstruct(), code.replace('.', ""));
        assert_eq!(parts.code_with_separator, code);
    }
}

#[test]
fn test_display_form_strips_back_to_raw() {
    for code in sample_codes() {
        let raw = code.replace('.', "");
        assert_eq!(strip_separator(&display_form(&raw)), raw);
    }
    assert_eq!(display_form("Z00"), "Z00");
}

#[test]
fn test_documented_examples() {
    let plain = decompose("A000").unwrap();
    assert_eq!(
        (plain.part1, plain.part2.as_str(), plain.part3.as_deref(), plain.part4),
        ('A', "00", Some("0"), None)
    );

    let extended = decompose("A001B").unwrap();
    assert_eq!(
        (extended.part1, extended.part2.as_str(), extended.part3.as_deref(), extended.part4),
        ('A', "00", Some("1"), Some('B'))
    );

    let category = decompose("Z00").unwrap();
    assert_eq!((category.part3, category.part4), (None, None));
}

#[test]
fn test_empty_code_is_invalid() {
    let err = decompose("").unwrap_err();
    assert!(matches!(err, ExtractError::InvalidCode(_)));
    assert!(err.to_string().starts_with("Invalid code"));
}

#[test]
fn test_chapter_from_decomposed_code() {
    assert_eq!(decompose("C50911").unwrap().chapter(), Some(IcdChapter::Neoplasms));
    assert_eq!(decompose("H6590").unwrap().chapter(), Some(IcdChapter::Ear));
    assert_eq!(decompose("O9A119").unwrap().chapter(), Some(IcdChapter::Pregnancy));
}
