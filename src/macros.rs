use ordermap::OrderMap;
use tracing::debug;

use super::EvalErr;
use super::parser::is_literal;

/// Macro table. Bodies are stored fully expanded, so a body only ever
/// mentions words that were not macros when it was recorded.
#[derive(Clone, Debug, Default)]
pub struct Macros(OrderMap<String, Vec<String>>);

impl Macros {
    pub fn new() -> Self {
        Macros(OrderMap::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Definitions in the order their names were first recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, body)| (name.as_str(), body.as_slice()))
    }

    /// Records a definition from the words following `:`. The final word
    /// must be `;`; everything between the name and it becomes the body.
    pub fn record(&mut self, mut words: Vec<String>) -> Result<(), EvalErr> {
        if words.is_empty() {
            return Err(EvalErr::MissingMacroName);
        }

        let name = words.remove(0);
        if is_literal(&name) {
            return Err(EvalErr::IllegalMacroName(name));
        }

        match words.pop() {
            Some(end) if end == ";" => (),
            _ => return Err(EvalErr::UnterminatedMacro(name)),
        }

        let mut body = Vec::with_capacity(words.len());
        self.expand_into(&words, &mut Vec::new(), &mut body)?;

        // Only reachable when the name is new: an existing name would have
        // been replaced by its old body above.
        if body.contains(&name) {
            return Err(EvalErr::MacroCycle(name));
        }

        debug!(
            name = %name,
            body = %body.join(" "),
            redefined = self.contains(&name),
            "recorded macro"
        );
        self.0.insert(name, body);
        Ok(())
    }

    fn expand_into<'a>(
        &'a self,
        words: &'a [String],
        chain: &mut Vec<&'a str>,
        out: &mut Vec<String>,
    ) -> Result<(), EvalErr> {
        for word in words {
            match self.0.get(word.as_str()) {
                Some(body) => {
                    if chain.contains(&word.as_str()) {
                        return Err(EvalErr::MacroCycle(word.clone()));
                    }

                    chain.push(word.as_str());
                    self.expand_into(body, chain, out)?;
                    chain.pop();
                },

                None => out.push(word.clone()),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
fn words(source: &str) -> Vec<String> {
    super::parser::tokenize(source)
}

#[test]
fn nested_definitions_flatten() {
    let mut macros = Macros::new();
    macros.record(words("double dup + ;")).unwrap();
    macros.record(words("quadruple double double ;")).unwrap();

    assert_eq!(
        macros.get("QUADRUPLE").unwrap(),
        &words("dup + dup +")[..]
    );
}

#[test]
fn redefinition_does_not_reach_back() {
    let mut macros = Macros::new();
    macros.record(words("a 1 ;")).unwrap();
    macros.record(words("b a ;")).unwrap();
    macros.record(words("a 2 ;")).unwrap();

    assert_eq!(macros.get("B").unwrap(), &words("1")[..]);
    assert_eq!(macros.get("A").unwrap(), &words("2")[..]);
}

#[test]
fn self_reference_uses_old_body() {
    let mut macros = Macros::new();
    macros.record(words("a 1 ;")).unwrap();
    macros.record(words("a a a ;")).unwrap();

    assert_eq!(macros.get("A").unwrap(), &words("1 1")[..]);
}

#[test]
fn rejected_definitions() {
    let mut macros = Macros::new();

    assert_eq!(macros.record(words("")), Err(EvalErr::MissingMacroName));
    assert_eq!(
        macros.record(words("-3 dup ;")),
        Err(EvalErr::IllegalMacroName("-3".into()))
    );
    assert_eq!(
        macros.record(words("foo 1 2")),
        Err(EvalErr::UnterminatedMacro("FOO".into()))
    );
    assert_eq!(
        macros.record(words("foo")),
        Err(EvalErr::UnterminatedMacro("FOO".into()))
    );
    assert!(macros.is_empty());
}

#[test]
fn cycles_are_rejected() {
    let mut macros = Macros::new();

    assert_eq!(macros.record(words("x x ;")), Err(EvalErr::MacroCycle("X".into())));

    macros.record(words("a b ;")).unwrap();
    assert_eq!(macros.record(words("b a ;")), Err(EvalErr::MacroCycle("B".into())));
    assert_eq!(macros.len(), 1);
}

#[test]
fn definition_order_is_kept() {
    let mut macros = Macros::new();
    macros.record(words("z 1 ;")).unwrap();
    macros.record(words("a 2 ;")).unwrap();
    macros.record(words("z 3 ;")).unwrap();

    let names: Vec<_> = macros.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Z", "A"]);
}
