use super::EvalErr;

/// Integer data stack. The last element is the top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stack(Vec<i64>);

impl Stack {
    pub fn new() -> Self {
        Stack(Vec::with_capacity(16))
    }

    /// Removes the top `N` values. They come back in push order, so the
    /// last element of the array was the top of the stack.
    pub fn pop_n<const N: usize>(&mut self) -> Result<[i64; N], EvalErr> {
        if self.0.len() < N {
            return Err(EvalErr::StackUnderflow);
        }

        let mut items = [0; N];
        let start = self.0.len() - N;
        for (slot, value) in items.iter_mut().zip(self.0.drain(start..)) {
            *slot = value;
        }

        Ok(items)
    }

    pub fn pop(&mut self) -> Result<i64, EvalErr> {
        let [top] = self.pop_n()?;
        Ok(top)
    }

    pub fn push<I: IntoIterator<Item = i64>>(&mut self, items: I) {
        self.0.extend(items);
    }

    pub fn peek(&mut self) -> Result<i64, EvalErr> {
        let top = self.pop()?;
        self.push([top]);
        Ok(top)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }
}

#[test]
fn pop_keeps_push_order() {
    let mut stack = Stack::new();
    stack.push([1, 2, 3]);

    assert_eq!(stack.pop_n::<2>().unwrap(), [2, 3]);
    assert_eq!(stack.as_slice(), &[1]);
}

#[test]
fn underflow_leaves_stack_alone() {
    let mut stack = Stack::new();
    stack.push([7]);

    assert_eq!(stack.pop_n::<2>(), Err(EvalErr::StackUnderflow));
    assert_eq!(stack.as_slice(), &[7]);
}

#[test]
fn peek_on_empty() {
    let mut stack = Stack::new();
    assert_eq!(stack.peek(), Err(EvalErr::StackUnderflow));

    stack.push([4, 5]);
    assert_eq!(stack.peek(), Ok(5));
    assert_eq!(stack.len(), 2);
}
