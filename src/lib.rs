use std::collections::VecDeque;

use thiserror::Error;
use tracing::{debug, trace};

mod display;
mod macros;
mod parser;
mod stack;

pub use display::Flattenable;
pub use macros::Macros;
pub use parser::{classify, is_literal, tokenize, Manip, Op, Token};
pub use stack::Stack;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErr {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("divided by zero")]
    DivideByZero,

    #[error("illegal macro name {0}")]
    IllegalMacroName(String),

    #[error("missing macro name after :")]
    MissingMacroName,

    #[error("macro {0} not terminated with ;")]
    UnterminatedMacro(String),

    #[error("can't understand {0}")]
    UndefinedOperation(String),

    #[error("macro {0} expands into itself")]
    MacroCycle(String),

    #[error("integer overflow")]
    IntegerOverflow,

    #[error("gave up after {0} steps")]
    StepLimit(usize),
}

/// Which binary operators refuse a zero on top of the stack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ZeroCheck {
    /// Only `/` checks its divisor.
    #[default]
    DivisionOnly,
    /// Every operator checks, even `+ - *`.
    AnyOperator,
}

#[derive(Clone, Debug, Default)]
pub struct EvalConfig {
    pub zero_check: ZeroCheck,
    /// Upper bound on dispatched words. `None` means unbounded.
    pub max_steps: Option<usize>,
}

pub struct Env {
    stack: Stack,
    macros: Macros,
    code: VecDeque<String>,
    config: EvalConfig,
    steps: usize,
}

/// Runs `lines` against a fresh environment and returns the final stack,
/// bottom first.
pub fn evaluate<I, S>(lines: I) -> Result<Vec<i64>, EvalErr>
    where I: IntoIterator<Item = S>, S: AsRef<str>
{
    evaluate_with(lines, EvalConfig::default())
}

pub fn evaluate_with<I, S>(lines: I, config: EvalConfig) -> Result<Vec<i64>, EvalErr>
    where I: IntoIterator<Item = S>, S: AsRef<str>
{
    let mut env = Env::with_config(config);
    env.run(lines)?;
    Ok(env.into_stack())
}

impl Env {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Env {
            stack: Stack::new(),
            macros: Macros::new(),
            code: VecDeque::with_capacity(16),
            config,
            steps: 0,
        }
    }

    pub fn run<I, S>(&mut self, lines: I) -> Result<(), EvalErr>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        for line in lines {
            self.eval_line(line.as_ref())?;
        }

        debug!(
            depth = self.stack.len(),
            macros = self.macros.len(),
            steps = self.steps,
            "evaluation finished"
        );
        Ok(())
    }

    /// Evaluates one command line. Any fault empties the stack and the
    /// pending words before it is returned.
    pub fn eval_line(&mut self, line: &str) -> Result<(), EvalErr> {
        self.code.extend(tokenize(line));

        while let Some(word) = self.code.pop_front() {
            match self.step(word) {
                Ok(()) => continue,

                Err(err) => {
                    debug!(error = %err, "evaluation aborted");
                    self.code.clear();
                    self.stack.clear();
                    return Err(err);
                },
            }
        }

        Ok(())
    }

    pub fn view(&self) -> &[i64] {
        self.stack.as_slice()
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn into_stack(self) -> Vec<i64> {
        self.stack.into_vec()
    }

    fn step(&mut self, word: String) -> Result<(), EvalErr> {
        self.steps += 1;
        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(EvalErr::StepLimit(max));
            }
        }

        trace!(word = %word, depth = self.stack.len(), "dispatch");

        match classify(&word, &self.macros)? {
            Token::Literal(int) => self.stack.push([int]),

            Token::MacroRef(name) => {
                let body = self.macros.get(&name)
                    .ok_or(EvalErr::UndefinedOperation(name.clone()))?;

                for word in body.iter().rev() {
                    self.code.push_front(word.clone());
                }
            },

            // Everything left on the line belongs to the definition.
            Token::DefBegin => {
                let words = self.code.drain(..).collect();
                self.macros.record(words)?;
            },

            Token::Operator(op) => self.binop(op)?,

            Token::StackOp(manip) => self.manip(manip)?,

            Token::DefEnd | Token::Unknown(_) => {
                return Err(EvalErr::UndefinedOperation(word));
            },
        }

        Ok(())
    }

    fn binop(&mut self, op: Op) -> Result<(), EvalErr> {
        let guarded = match self.config.zero_check {
            ZeroCheck::DivisionOnly => op == Op::Div,
            ZeroCheck::AnyOperator => true,
        };

        if guarded && !self.stack.is_empty() && self.stack.peek()? == 0 {
            return Err(EvalErr::DivideByZero);
        }

        let [lhs, rhs] = self.stack.pop_n()?;
        let result = match op {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Div => floor_div(lhs, rhs),
        };

        self.stack.push([result.ok_or(EvalErr::IntegerOverflow)?]);
        Ok(())
    }

    fn manip(&mut self, manip: Manip) -> Result<(), EvalErr> {
        match manip {
            Manip::Dup => {
                let top = self.stack.pop()?;
                self.stack.push([top, top]);
            },

            Manip::Drop => { let _ = self.stack.pop()?; },

            Manip::Swap => {
                let [a, b] = self.stack.pop_n()?;
                self.stack.push([b, a]);
            },

            Manip::Over => {
                let [a, b] = self.stack.pop_n()?;
                self.stack.push([a, b, a]);
            },
        }

        Ok(())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// Division rounding toward negative infinity.
fn floor_div(lhs: i64, rhs: i64) -> Option<i64> {
    let quot = lhs.checked_div(rhs)?;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        Some(quot - 1)
    } else {
        Some(quot)
    }
}

#[test]
fn floor_division() {
    let cases = vec![
        ((7, 2), Some(3)),
        ((-7, 2), Some(-4)),
        ((7, -2), Some(-4)),
        ((-7, -2), Some(3)),
        ((-8, 2), Some(-4)),
        ((i64::MIN, -1), None),
    ];

    for ((lhs, rhs), expected) in cases {
        assert_eq!(floor_div(lhs, rhs), expected, "{} / {}", lhs, rhs);
    }
}

#[test]
fn zero_check_modes() {
    assert_eq!(evaluate(&["4 0 +"]), Ok(vec![4]));
    assert_eq!(evaluate(&["4 0 /"]), Err(EvalErr::DivideByZero));

    let strict = EvalConfig {
        zero_check: ZeroCheck::AnyOperator,
        ..EvalConfig::default()
    };
    assert_eq!(evaluate_with(&["4 0 +"], strict.clone()), Err(EvalErr::DivideByZero));
    assert_eq!(evaluate_with(&["4 0 *"], strict.clone()), Err(EvalErr::DivideByZero));
    assert_eq!(evaluate_with(&["0 4 -"], strict), Ok(vec![-4]));
}

#[test]
fn zero_check_precedes_underflow() {
    assert_eq!(evaluate(&["0 /"]), Err(EvalErr::DivideByZero));
    assert_eq!(evaluate(&["/"]), Err(EvalErr::StackUnderflow));
}

#[test]
fn definition_swallows_rest_of_line() {
    assert_eq!(
        evaluate(&[": foo 1 ; 2"]),
        Err(EvalErr::UnterminatedMacro("FOO".into()))
    );

    assert_eq!(
        evaluate(&[": foo 1 ; ;", "foo"]),
        Err(EvalErr::UndefinedOperation(";".into()))
    );
}

#[test]
fn words_before_definition_still_run() {
    let mut env = Env::new();
    env.run(&["1 2 : three 3 ;", "three +"]).unwrap();
    assert_eq!(env.view(), &[1, 5]);
}

#[test]
fn macros_shadow_builtins() {
    assert_eq!(evaluate(&[": swap dup ;", "1 swap"]), Ok(vec![1, 1]));
    assert_eq!(evaluate(&[": + * ;", "3 4 +"]), Ok(vec![12]));
}

#[test]
fn macro_body_splices_before_rest() {
    assert_eq!(
        evaluate(&[": pair 1 2 ;", "pair 3 pair"]),
        Ok(vec![1, 2, 3, 1, 2])
    );
}

#[test]
fn forward_reference_resolves_at_call() {
    assert_eq!(evaluate(&[": a b ;", ": b 7 ;", "a"]), Ok(vec![7]));
    assert_eq!(
        evaluate(&[": a b ;", "a"]),
        Err(EvalErr::UndefinedOperation("B".into()))
    );
}

#[test]
fn step_limit() {
    let config = EvalConfig {
        max_steps: Some(3),
        ..EvalConfig::default()
    };

    assert_eq!(evaluate_with(&["1 2 +"], config.clone()), Ok(vec![3]));
    assert_eq!(evaluate_with(&["1 2 + 4"], config), Err(EvalErr::StepLimit(3)));
}

#[test]
fn overflow() {
    assert_eq!(
        evaluate(&["9223372036854775807 1 +"]),
        Err(EvalErr::IntegerOverflow)
    );
    assert_eq!(
        evaluate(&["9223372036854775808"]),
        Err(EvalErr::IntegerOverflow)
    );
}

#[test]
fn failure_clears_state() {
    let mut env = Env::new();
    assert!(env.eval_line("1 2 3 bogus 4").is_err());
    assert!(env.view().is_empty());

    env.eval_line("5").unwrap();
    assert_eq!(env.view(), &[5]);
}
