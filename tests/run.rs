extern crate macroforth;

use macroforth::*;
use pretty_assertions::assert_eq;

macro_rules! valid {
    ( $name:ident $(, $value:expr )* ) => {
        #[test]
        fn $name() {
            let source = {
                include_str!(concat!("valid/", stringify!($name), ".fth"))
            };

            let mut env = Env::new();
            env.run(source.lines()).unwrap();

            let expected: Vec<i64> = vec![ $( $value ),* ];
            assert_eq!(env.view(), &expected[..]);
        }
    };
}

macro_rules! invalid {
    ( $name:ident, $err:expr ) => {
        #[test]
        fn $name() {
            let source = {
                include_str!(concat!("invalid/", stringify!($name), ".fth"))
            };

            assert_eq!(evaluate(source.lines()), Err($err));
        }
    };
}

valid!(quadruple, 12);
valid!(redefine, 1, 2);
valid!(manipulation, 1, 2, 2, 2);
valid!(negatives, -2, -4);
valid!(case_insensitive, 16, 4);
valid!(empty);

invalid!(divide_by_zero, EvalErr::DivideByZero);
invalid!(underflow, EvalErr::StackUnderflow);
invalid!(numeric_name, EvalErr::IllegalMacroName("1".into()));
invalid!(unterminated, EvalErr::UnterminatedMacro("FOO".into()));
invalid!(undefined, EvalErr::UndefinedOperation("FOO".into()));
invalid!(cycle, EvalErr::MacroCycle("B".into()));
