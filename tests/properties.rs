extern crate macroforth;

use macroforth::*;
use pretty_assertions::assert_eq;

fn starting_stacks() -> Vec<Vec<i64>> {
    vec![
        vec![0],
        vec![-1, 9],
        vec![3, 1, 4, 1, 5],
        vec![i64::MAX, i64::MIN, 0],
    ]
}

fn source_for(stack: &[i64]) -> String {
    stack.flatten(" ")
}

#[test]
fn literals_are_pushed_in_order() {
    for stack in starting_stacks() {
        assert_eq!(evaluate(&[source_for(&stack)]), Ok(stack.clone()));
    }
}

#[test]
fn literals_split_across_lines() {
    assert_eq!(evaluate(&["1 2", "", "3"]), Ok(vec![1, 2, 3]));
}

#[test]
fn dup_then_drop_is_identity() {
    for stack in starting_stacks() {
        let lines = vec![source_for(&stack), "dup drop".to_string()];
        assert_eq!(evaluate(&lines), Ok(stack.clone()));
    }
}

#[test]
fn swap_twice_is_identity() {
    for stack in starting_stacks().into_iter().filter(|s| s.len() >= 2) {
        let lines = vec![source_for(&stack), "swap swap".to_string()];
        assert_eq!(evaluate(&lines), Ok(stack.clone()));
    }
}

#[test]
fn popping_past_the_bottom_underflows() {
    let cases = vec![
        ("dup", 0),
        ("drop", 0),
        ("swap", 1),
        ("over", 1),
        ("+", 1),
        ("*", 0),
    ];

    for (word, depth) in cases {
        let source = format!("{} {}", vec!["7"; depth].join(" "), word);
        assert_eq!(evaluate(&[source]), Err(EvalErr::StackUnderflow), "{}", word);
    }
}

#[test]
fn deep_macro_chain_terminates() {
    let mut lines = vec![": m0 1 + ;".to_string()];
    for i in 1..12 {
        lines.push(format!(": m{} m{} m{} ;", i, i - 1, i - 1));
    }
    lines.push("0 m11".to_string());

    assert_eq!(evaluate(&lines), Ok(vec![2048]));
}

#[test]
fn reference_examples() {
    assert_eq!(
        evaluate(&[": double dup + ;", ": quadruple double double ;", "3 quadruple"]),
        Ok(vec![12])
    );
    assert_eq!(evaluate(&["5 3 -"]), Ok(vec![2]));
    assert_eq!(evaluate(&["5 0 /"]), Err(EvalErr::DivideByZero));
    assert_eq!(evaluate(&["1 2 3 OVER"]), Ok(vec![1, 2, 3, 2]));
    assert_eq!(
        evaluate(&[": a 1 ;", ": b a ;", ": a 2 ;", "b"]),
        Ok(vec![1])
    );
    assert_eq!(evaluate(&["-5 3 +"]), Ok(vec![-2]));
}

#[test]
fn arithmetic_operand_order() {
    assert_eq!(evaluate(&["12 4 /"]), Ok(vec![3]));
    assert_eq!(evaluate(&["4 12 /"]), Ok(vec![0]));
    assert_eq!(evaluate(&["2 3 * 1 -"]), Ok(vec![5]));
}

#[test]
fn macros_do_not_outlive_evaluation() {
    assert_eq!(evaluate(&[": one 1 ;", "one"]), Ok(vec![1]));
    assert_eq!(
        evaluate(&["one"]),
        Err(EvalErr::UndefinedOperation("ONE".into()))
    );
}
