use super::EvalErr;
use super::macros::Macros;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Manip {
    Dup,
    Drop,
    Swap,
    Over,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Literal(i64),
    Operator(Op),
    StackOp(Manip),
    DefBegin,
    DefEnd,
    MacroRef(String),
    Unknown(String),
}

/// Splits one command line into upcased words.
pub fn tokenize(line: &str) -> Vec<String> {
    line.to_uppercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// An optional single `-` followed by one or more ASCII digits.
pub fn is_literal(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves a word against the fixed symbol sets and the macro table.
/// Macros shadow every builtin except integer literals.
pub fn classify(word: &str, macros: &Macros) -> Result<Token, EvalErr> {
    if is_literal(word) {
        let int = word.parse::<i64>().map_err(|_| EvalErr::IntegerOverflow)?;
        return Ok(Token::Literal(int));
    }

    if macros.contains(word) {
        return Ok(Token::MacroRef(word.to_owned()));
    }

    Ok(match word {
        ":" => Token::DefBegin,
        ";" => Token::DefEnd,

        "+" => Token::Operator(Op::Add),
        "-" => Token::Operator(Op::Sub),
        "*" => Token::Operator(Op::Mul),
        "/" => Token::Operator(Op::Div),

        "DUP" => Token::StackOp(Manip::Dup),
        "DROP" => Token::StackOp(Manip::Drop),
        "SWAP" => Token::StackOp(Manip::Swap),
        "OVER" => Token::StackOp(Manip::Over),

        other => Token::Unknown(other.to_owned()),
    })
}

#[test]
fn literal_shapes() {
    let cases = vec![
        ("0", true),
        ("42", true),
        ("-5", true),
        ("-", false),
        ("--5", false),
        ("5-", false),
        ("+5", false),
        ("1A", false),
        ("", false),
    ];

    for (word, expected) in cases {
        assert_eq!(is_literal(word), expected, "{:?}", word);
    }
}

#[test]
fn tokenize_upcases_and_splits() {
    assert_eq!(tokenize("  dup\t1 -2  swap\n"), vec!["DUP", "1", "-2", "SWAP"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn classify_builtins() {
    let macros = Macros::new();

    assert_eq!(classify("-7", &macros), Ok(Token::Literal(-7)));
    assert_eq!(classify("/", &macros), Ok(Token::Operator(Op::Div)));
    assert_eq!(classify("OVER", &macros), Ok(Token::StackOp(Manip::Over)));
    assert_eq!(classify(":", &macros), Ok(Token::DefBegin));
    assert_eq!(classify(";", &macros), Ok(Token::DefEnd));
    assert_eq!(classify("FOO", &macros), Ok(Token::Unknown("FOO".into())));
    assert_eq!(
        classify("99999999999999999999", &macros),
        Err(EvalErr::IntegerOverflow)
    );
}

#[test]
fn macros_shadow_builtins() {
    let mut macros = Macros::new();
    macros.record(tokenize("DUP 1 ;")).unwrap();

    assert_eq!(classify("DUP", &macros), Ok(Token::MacroRef("DUP".into())));
}
