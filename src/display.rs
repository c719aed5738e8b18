use std::fmt;

use super::*;

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
        })
    }
}

impl fmt::Display for Manip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Manip::Dup => "DUP",
            Manip::Drop => "DROP",
            Manip::Swap => "SWAP",
            Manip::Over => "OVER",
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Literal(i) => write!(f, "{}", i),

            Token::Operator(op) => write!(f, "{}", op),

            Token::StackOp(manip) => write!(f, "{}", manip),

            Token::DefBegin => write!(f, ":"),

            Token::DefEnd => write!(f, ";"),

            Token::MacroRef(name) | Token::Unknown(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_slice().flatten(" "))
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, body) in self.iter() {
            writeln!(f, ": {} {} ;", name, body.flatten(" "))?;
        }
        Ok(())
    }
}

pub trait Flattenable {
    fn flatten(&self, sep: &str) -> String;
}

impl<T: fmt::Display> Flattenable for [T] {
    fn flatten(&self, sep: &str) -> String {
        self.iter().map(|item| {
            format!("{}", item)
        }).collect::<Vec<_>>().join(sep)
    }
}

#[test]
fn macro_listing() {
    let mut env = Env::new();
    env.run(&[": sq dup * ;", ": cube dup sq * ;"]).unwrap();

    assert_eq!(
        env.macros().to_string(),
        ": SQ DUP * ;\n: CUBE DUP DUP * * ;\n"
    );
}

#[test]
fn stack_listing() {
    let mut env = Env::new();
    env.run(&["1 -2 3"]).unwrap();

    assert_eq!(format!("{}", env.stack()), "1 -2 3");
}
